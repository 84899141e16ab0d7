// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Property tests: random control-flow graphs keep balanced use counts and
//! consistent edges through construction and optimization.

use mcc_const::{Constant, OperationOp};
use mcc_mir::analyzer::{verify_edges, verify_terminators, verify_use_counts};
use mcc_mir::opt::fusion::find_fusible_pair;
use mcc_mir::opt::BlockOptimizer;
use mcc_mir::{IRBuilder, Module, Parameter};
use mcc_span::Span;
use mcc_types::TyCtx;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Exit {
    Return,
    Jump(usize),
    Branch(usize, usize),
}

#[derive(Debug, Clone)]
struct BlockShape {
    operations: usize,
    exit: Exit,
}

fn block_shape(count: usize) -> impl Strategy<Value = BlockShape> {
    let exit = prop_oneof![
        Just(Exit::Return),
        (0..count).prop_map(Exit::Jump),
        (0..count, 0..count).prop_map(|(a, b)| Exit::Branch(a, b)),
    ];
    (0usize..3, exit).prop_map(|(operations, exit)| BlockShape { operations, exit })
}

fn graph_shape() -> impl Strategy<Value = Vec<BlockShape>> {
    (1usize..8).prop_flat_map(|count| prop::collection::vec(block_shape(count), count))
}

fn build(tcx: &TyCtx, shapes: &[BlockShape]) -> Module {
    let _ = env_logger::builder().is_test(true).try_init();
    let span = Span::default();
    let mut b = IRBuilder::new(tcx, "prop");
    b.create_function("f", vec![Parameter::by_value("x", tcx.integer())], tcx.integer(), false, span).unwrap();
    let x = b.argument(0).unwrap();
    let acc = b.declare_variable("acc", tcx.integer(), true, None, span).unwrap();

    let mut blocks = vec![b.current_block().unwrap()];
    for _ in 1..shapes.len() {
        blocks.push(b.create_block().unwrap());
    }

    for (index, shape) in shapes.iter().enumerate() {
        b.switch_to_block(blocks[index]).unwrap();
        for _ in 0..shape.operations {
            let sum = b.operation(OperationOp::Add, vec![acc, x], span).unwrap();
            b.store(acc, sum, span).unwrap();
        }
        match shape.exit {
            Exit::Return => {
                b.ret(Some(acc), span).unwrap();
            },
            Exit::Jump(target) => {
                b.direct_jump(blocks[target], span).unwrap();
            },
            Exit::Branch(then_idx, else_idx) => {
                let zero = b.constant(Constant::Integer(0), span).unwrap();
                let cond = b.comparison(mcc_const::ComparisonOp::Gt, x, zero, span).unwrap();
                b.branch(cond, blocks[then_idx], blocks[else_idx], span).unwrap();
            },
        }
    }
    b.finish()
}

proptest! {
    #[test]
    fn prop_construction_keeps_counts_balanced(shapes in graph_shape()) {
        let tcx = TyCtx::new();
        let module = build(&tcx, &shapes);
        let func = &module.functions[0];
        prop_assert!(verify_use_counts(func).is_ok());
        prop_assert!(verify_edges(func));
        prop_assert!(verify_terminators(func));
    }

    #[test]
    fn prop_optimizer_reaches_a_fixed_point(shapes in graph_shape()) {
        let tcx = TyCtx::new();
        let mut module = build(&tcx, &shapes);
        BlockOptimizer::run_module(&mut module);

        let func = &mut module.functions[0];
        prop_assert!(verify_use_counts(func).is_ok());
        prop_assert!(verify_edges(func));
        prop_assert!(verify_terminators(func));
        prop_assert!(find_fusible_pair(func).is_none());

        let entry = func.entry();
        for block in &func.block_order {
            if *block != entry {
                prop_assert!(!func.block(*block).unwrap().predecessors.is_empty());
            }
        }

        let again = BlockOptimizer::run(func);
        prop_assert_eq!(again.erased + again.fused, 0);
    }
}
