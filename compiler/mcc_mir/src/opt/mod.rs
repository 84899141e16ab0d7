// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod dead_blocks;
pub mod fusion;

use log::debug;

use crate::analyzer::verify_edges;
use crate::function::Function;
use crate::module::Module;

pub use dead_blocks::eliminate_dead_blocks;
pub use fusion::fuse_blocks;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OptStats {
    pub erased: usize,
    pub fused: usize,
    pub rounds: usize,
}

impl OptStats {
    fn absorb(&mut self, other: OptStats) {
        self.erased += other.erased;
        self.fused += other.fused;
        self.rounds += other.rounds;
    }
}

/// Runs dead-block elimination and straight-line fusion until neither
/// changes the graph.
pub struct BlockOptimizer;

impl BlockOptimizer {
    pub fn run(func: &mut Function) -> OptStats {
        let mut stats = OptStats::default();
        loop {
            stats.rounds += 1;
            let erased = eliminate_dead_blocks(func);
            let fused = fuse_blocks(func);
            debug_assert!(verify_edges(func), "edge sets of {} are inconsistent", func.location);

            stats.erased += erased;
            stats.fused += fused;
            if erased == 0 && fused == 0 {
                break;
            }
        }
        debug!(
            "optimized {}: {} block(s) erased, {} fused, {} round(s)",
            func.location, stats.erased, stats.fused, stats.rounds
        );
        stats
    }

    pub fn run_module(module: &mut Module) -> OptStats {
        let mut total = OptStats::default();
        for func in module.functions.iter_mut() {
            total.absorb(Self::run(func));
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{verify_edges, verify_use_counts};
    use crate::builder::IRBuilder;
    use crate::instruction::IRInstruction;
    use crate::opt::fusion::find_fusible_pair;
    use mcc_const::Constant;
    use mcc_span::Span;
    use mcc_types::TyCtx;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn test_dead_blocks_cascade() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("main", vec![], tcx.void(), false, span()).unwrap();
        b.ret(None, span()).unwrap();
        let first = b.create_block().unwrap();
        let second = b.create_block().unwrap();
        b.switch_to_block(first).unwrap();
        b.direct_jump(second, span()).unwrap();
        b.switch_to_block(second).unwrap();
        b.ret(None, span()).unwrap();

        let mut module = b.finish();
        let func = &mut module.functions[0];
        assert_eq!(eliminate_dead_blocks(func), 2);
        assert_eq!(func.block_order.len(), 1);
        assert!(verify_edges(func));
    }

    #[test]
    fn test_straight_line_blocks_fuse() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("main", vec![], tcx.void(), false, span()).unwrap();
        b.command("say one", true, span()).unwrap();
        let next = b.create_block().unwrap();
        b.direct_jump(next, span()).unwrap();
        b.switch_to_block(next).unwrap();
        b.command("say two", true, span()).unwrap();
        b.ret(None, span()).unwrap();

        let mut module = b.finish();
        let func = &mut module.functions[0];
        let stats = BlockOptimizer::run(func);
        assert_eq!(stats.fused, 1);
        assert_eq!(func.block_order.len(), 1);

        let texts = func
            .instructions()
            .filter_map(|(_, _, inst)| match inst {
                IRInstruction::Command { text, .. } => Some(text.clone()),
                _ => None
            })
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["say one", "say two"]);
        assert!(matches!(func.terminator(func.entry()), Some(IRInstruction::Return { .. })));
    }

    #[test]
    fn test_fused_phi_jump_becomes_store() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("main", vec![], tcx.integer(), false, span()).unwrap();
        let slot = b.create_branch_result(tcx.integer(), span()).unwrap();
        let seven = b.constant(Constant::Integer(7), span()).unwrap();
        let join = b.create_block().unwrap();
        b.direct_jump_with(join, seven, slot, span()).unwrap();
        b.switch_to_block(join).unwrap();
        b.ret(Some(slot), span()).unwrap();

        let mut module = b.finish();
        let func = &mut module.functions[0];
        BlockOptimizer::run(func);

        let entry = func.block(func.entry()).unwrap();
        let first = func.instruction(entry.instructions[0]).unwrap();
        assert!(matches!(first, IRInstruction::Store { dst, src } if *dst == slot && *src == seven));
        assert!(verify_use_counts(func).is_ok());
        assert_eq!(func.value(slot).unwrap().use_count(), 2);
    }

    #[test]
    fn test_join_with_two_predecessors_is_kept() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("main", vec![crate::Parameter::by_value("x", tcx.integer())], tcx.void(), false, span()).unwrap();
        let x = b.argument(0).unwrap();
        let (left, right, join) = (b.create_block().unwrap(), b.create_block().unwrap(), b.create_block().unwrap());
        b.branch(x, left, right, span()).unwrap();
        for side in [left, right] {
            b.switch_to_block(side).unwrap();
            b.direct_jump(join, span()).unwrap();
        }
        b.switch_to_block(join).unwrap();
        b.ret(None, span()).unwrap();

        let mut module = b.finish();
        let func = &mut module.functions[0];
        let stats = BlockOptimizer::run(func);
        assert_eq!(stats, OptStats { erased: 0, fused: 0, rounds: 1 });
        assert_eq!(func.block_order.len(), 4);
    }

    #[test]
    fn test_landing_pad_is_not_fused() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        let risky = b.create_function("risky", vec![], tcx.void(), true, span()).unwrap();
        b.ret(None, span()).unwrap();

        b.create_function("main", vec![], tcx.void(), false, span()).unwrap();
        let landing = b.create_block().unwrap();
        b.call(risky, vec![], Some(landing), span()).unwrap();
        b.direct_jump(landing, span()).unwrap();
        b.switch_to_block(landing).unwrap();
        b.ret(None, span()).unwrap();

        let mut module = b.finish();
        let func = &mut module.functions[1];
        assert_eq!(find_fusible_pair(func), None);
        assert_eq!(BlockOptimizer::run(func).fused, 0);
    }

    #[test]
    fn test_self_loop_is_not_fused() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("spin", vec![], tcx.void(), false, span()).unwrap();
        let body = b.create_block().unwrap();
        b.direct_jump(body, span()).unwrap();
        b.switch_to_block(body).unwrap();
        b.command("say tick", true, span()).unwrap();
        b.direct_jump(body, span()).unwrap();

        let mut module = b.finish();
        let func = &mut module.functions[0];
        assert_eq!(find_fusible_pair(func), None);
        assert_eq!(func.block_order.len(), 2);
    }

    #[test]
    fn test_fixed_point_leaves_nothing_to_do() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("main", vec![], tcx.void(), false, span()).unwrap();
        let blocks = (0..4).map(|_| b.create_block().unwrap()).collect::<Vec<_>>();
        b.direct_jump(blocks[0], span()).unwrap();
        for pair in blocks.windows(2) {
            b.switch_to_block(pair[0]).unwrap();
            b.direct_jump(pair[1], span()).unwrap();
        }
        b.switch_to_block(blocks[3]).unwrap();
        b.ret(None, span()).unwrap();

        let mut module = b.finish();
        let stats = BlockOptimizer::run_module(&mut module);
        let func = &module.functions[0];
        assert_eq!(stats.fused, 4);
        assert_eq!(func.block_order.len(), 1);
        assert_eq!(find_fusible_pair(func), None);
    }
}
