// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::{IndexMap, IndexSet};

use crate::arena::{BlockId, ValueId};
use crate::function::{Function, FunctionId};
use crate::module::Module;

/// A function needs a frame if it owns any slot or any of its
/// instructions writes into the frame.
pub fn requires_frame(func: &Function) -> bool {
    func.stack_slot_counter > 0 || func.instructions().any(|(_, id, _)| func.requires_stack(id))
}

/// Frame decision for every function of the module, computed up front so
/// callers can see whether a callee pushes a frame.
pub fn frame_table(module: &Module) -> IndexMap<FunctionId, bool> {
    module.functions.iter().map(|f| (f.id, requires_frame(f))).collect()
}

/// Counts, for every live value, how many instructions reference it.
pub fn recount_uses(func: &Function) -> IndexMap<ValueId, usize> {
    let mut counts: IndexMap<ValueId, usize> = func.values.keys().map(|id| (id, 0)).collect();
    for (_, _, inst) in func.instructions() {
        for operand in inst.operands() {
            *counts.entry(operand).or_insert(0) += 1;
        }
    }
    counts
}

/// Values whose stored use count disagrees with the graph, as
/// `(value, stored, counted)`.
pub fn verify_use_counts(func: &Function) -> Result<(), Vec<(ValueId, usize, usize)>> {
    let mismatches = recount_uses(func)
        .into_iter()
        .filter_map(|(id, counted)| {
            let stored = func.value(id).map(|v| v.use_count()).unwrap_or(0);
            (stored != counted).then_some((id, stored, counted))
        })
        .collect::<Vec<_>>();
    if mismatches.is_empty() { Ok(()) } else { Err(mismatches) }
}

/// Successor sets match what the instructions jump to, and predecessor
/// sets mirror them.
pub fn verify_edges(func: &Function) -> bool {
    for block_id in &func.block_order {
        let Some(block) = func.block(*block_id) else {
            return false;
        };
        let expected = block
            .instructions
            .iter()
            .filter_map(|id| func.instruction(*id))
            .flat_map(|inst| inst.successors())
            .collect::<IndexSet<BlockId>>();
        if expected.len() != block.successors.len() || !expected.iter().all(|b| block.successors.contains(b)) {
            return false;
        }
        for succ in &block.successors {
            if !func.block(*succ).is_some_and(|s| s.predecessors.contains(block_id)) {
                return false;
            }
        }
        for pred in &block.predecessors {
            if !func.block(*pred).is_some_and(|p| p.successors.contains(block_id)) {
                return false;
            }
        }
    }
    true
}

/// No terminator appears before the last instruction of a block.
pub fn verify_terminators(func: &Function) -> bool {
    func.block_order.iter().all(|block| {
        let Some(b) = func.block(*block) else {
            return false;
        };
        let count = b.instructions.len();
        b.instructions
            .iter()
            .take(count.saturating_sub(1))
            .all(|id| !func.instruction(*id).is_some_and(|inst| inst.is_terminator()))
    })
}
