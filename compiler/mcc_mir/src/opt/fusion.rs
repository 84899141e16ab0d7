// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use log::trace;

use crate::arena::BlockId;
use crate::function::Function;
use crate::instruction::{IRInstruction, PhiWrite};
use crate::value::ValueKind;

/// Merges straight-line block pairs until none is left. Returns the number
/// of merges.
pub fn fuse_blocks(func: &mut Function) -> usize {
    let mut fused = 0;
    while let Some((block, succ)) = find_fusible_pair(func) {
        fuse(func, block, succ);
        fused += 1;
    }
    fused
}

/// `block` ends in a direct jump to `succ`, which has no other
/// predecessor, is not the entry, and is not a landing pad of `block`.
pub fn find_fusible_pair(func: &Function) -> Option<(BlockId, BlockId)> {
    let entry = func.entry();
    for block_id in &func.block_order {
        let Some(block) = func.block(*block_id) else {
            continue;
        };
        if block.successors.len() != 1 {
            continue;
        }
        let Some(succ) = block.successors.get_index(0).copied() else {
            continue;
        };
        if succ == *block_id || succ == entry {
            continue;
        }
        if !matches!(func.terminator(*block_id), Some(IRInstruction::DirectJump { .. })) {
            continue;
        }
        let single_pred = func
            .block(succ)
            .is_some_and(|s| s.predecessors.len() == 1 && s.predecessors.contains(block_id));
        if !single_pred {
            continue;
        }
        let is_landing_pad = block
            .instructions
            .iter()
            .any(|id| func.instruction(*id).and_then(IRInstruction::landing_pad) == Some(succ));
        if is_landing_pad {
            continue;
        }
        return Some((*block_id, succ));
    }
    None
}

fn fuse(func: &mut Function, block: BlockId, succ: BlockId) {
    if let (Some(from), Some(to)) = (func.block_location(block), func.block_location(succ)) {
        trace!("fusing {to} into {from}");
    }

    let Some(jump) = func.block_mut(block).and_then(|b| b.instructions.pop()) else {
        return;
    };
    let phi = match func.instruction(jump) {
        Some(IRInstruction::DirectJump { phi, .. }) => *phi,
        _ => None
    };
    match phi {
        // the jump's uses of value and slot carry over to the store
        Some(PhiWrite { value, slot }) => {
            if let Some(v) = func.value_mut(jump) {
                v.kind = ValueKind::Instruction(IRInstruction::Store { dst: slot, src: value });
            }
            if let Some(b) = func.block_mut(block) {
                b.instructions.push(jump);
            }
        },
        None => {
            func.erase_value(jump);
        }
    }

    let Some(removed) = func.blocks.remove(succ) else {
        return;
    };
    for next in &removed.successors {
        if let Some(n) = func.block_mut(*next) {
            n.predecessors.shift_remove(&succ);
            n.predecessors.insert(block);
        }
    }
    if let Some(b) = func.block_mut(block) {
        b.instructions.extend(removed.instructions);
        b.successors = removed.successors;
    }
    func.block_order.retain(|b| *b != succ);
}
