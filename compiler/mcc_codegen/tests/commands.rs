// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_codegen::generator::generate;
use mcc_codegen::Package;
use mcc_const::{ComparisonOp, Constant, OperationOp, ResourceLocation};
use mcc_errors::ErrCode;
use mcc_mir::instruction::MutateOp;
use mcc_mir::{IRBuilder, Parameter, RuntimeLayout};
use mcc_span::Span;
use mcc_types::TyCtx;

fn sp() -> Span {
    Span::default()
}

fn lines(package: &Package, location: &str) -> Vec<String> {
    package
        .lines(location)
        .unwrap_or_else(|| panic!("no procedure {location} in\n{}", package.render()))
        .to_vec()
}

fn build(tcx: &TyCtx, f: impl FnOnce(&mut IRBuilder<'_>)) -> Package {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut b = IRBuilder::new(tcx, "demo");
    f(&mut b);
    let module = b.finish();
    generate(&module, tcx, &RuntimeLayout::default()).unwrap()
}

#[test]
fn test_folded_constant_is_stored_directly() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("main", vec![], tcx.void(), false, sp()).unwrap();
        let two = b.constant(Constant::Integer(2), sp()).unwrap();
        let three = b.constant(Constant::Integer(3), sp()).unwrap();
        let sum = b.operation(OperationOp::Add, vec![two, three], sp()).unwrap();
        b.declare_variable("x", tcx.integer(), true, Some(sum), sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    assert_eq!(lines(&package, "demo:main"), vec![
        "data modify storage mcc:runtime stack prepend value {s0:0}",
        "data modify storage mcc:runtime stack[0].s0 set value 0",
        "data modify storage mcc:runtime stack[0].s0 set value 5",
        "data remove storage mcc:runtime stack[0]",
        "return 0",
    ]);
}

#[test]
fn test_init_procedure_is_load_tagged() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_global("count", tcx.integer(), None, sp()).unwrap();
        b.create_global("name", tcx.string(), Some(Constant::from("steve")), sp()).unwrap();
    });

    assert_eq!(lines(&package, "demo:__init"), vec![
        "scoreboard objectives add mcc.regs dummy",
        "data modify storage mcc:runtime stack set value []",
        "data modify storage mcc:runtime globals set value {}",
        "data modify storage mcc:runtime globals.count set value 0",
        "data modify storage mcc:runtime globals.name set value \"steve\"",
    ]);
    let load: ResourceLocation = "minecraft:load".parse().unwrap();
    let init: ResourceLocation = "demo:__init".parse().unwrap();
    assert!(package.tags[&load].contains(&init));
}

#[test]
fn test_function_without_frame_skips_push_and_pop() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("greet", vec![Parameter::by_value("x", tcx.integer())], tcx.void(), false, sp()).unwrap();
        let x = b.argument(0).unwrap();
        b.intrinsic("print", vec![x], sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    assert_eq!(lines(&package, "demo:greet"), vec!["$tellraw @a [\"$(x)\"]", "return 0"]);
}

#[test]
fn test_repeated_operand_is_loaded_once() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_global("g", tcx.integer(), None, sp()).unwrap();
        b.create_function("double", vec![Parameter::by_value("a", tcx.integer())], tcx.void(), false, sp()).unwrap();
        let a = b.argument(0).unwrap();
        let sum = b.operation(OperationOp::Add, vec![a, a], sp()).unwrap();
        let g = b.lookup_variable("g", sp()).unwrap();
        b.store(g, sum, sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    let body = lines(&package, "demo:double");
    let loads = body.iter().filter(|l| l.contains("scoreboard players set")).count();
    assert_eq!(loads, 1);
    assert!(body.contains(&String::from("$scoreboard players set %r0 mcc.regs $(a)")));
    assert!(body.contains(&String::from("scoreboard players operation %r0 mcc.regs += %r0 mcc.regs")));
    assert!(!body.iter().any(|l| l.contains("%r1")));
    assert_eq!(body.first().map(String::as_str), Some("data modify storage mcc:runtime stack prepend value {}"));
}

#[test]
fn test_literal_addend_uses_add_and_remove() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_global("g", tcx.integer(), None, sp()).unwrap();
        b.create_function("step", vec![], tcx.void(), false, sp()).unwrap();
        let g = b.lookup_variable("g", sp()).unwrap();
        let four = b.constant(Constant::Integer(4), sp()).unwrap();
        let diff = b.operation(OperationOp::Sub, vec![g, four], sp()).unwrap();
        let g2 = b.lookup_variable("g", sp()).unwrap();
        b.store(g2, diff, sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    let body = lines(&package, "demo:step");
    assert!(body.contains(&String::from(
        "execute store result score %r0 mcc.regs run data get storage mcc:runtime globals.g"
    )));
    assert!(body.contains(&String::from("scoreboard players remove %r0 mcc.regs 4")));
}

#[test]
fn test_if_else_forwards_macro_arguments() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("f", vec![Parameter::by_value("x", tcx.integer())], tcx.void(), false, sp()).unwrap();
        let x = b.argument(0).unwrap();
        let three = b.constant(Constant::Integer(3), sp()).unwrap();
        let cmp = b.comparison(ComparisonOp::Lt, x, three, sp()).unwrap();
        let then_block = b.create_block().unwrap();
        let else_block = b.create_block().unwrap();
        let join = b.create_block().unwrap();
        b.branch(cmp, then_block, else_block, sp()).unwrap();

        for (block, text) in [(then_block, "lo"), (else_block, "hi")] {
            b.switch_to_block(block).unwrap();
            let msg = b.constant(Constant::from(text), sp()).unwrap();
            b.intrinsic("print", vec![msg], sp()).unwrap();
            b.direct_jump(join, sp()).unwrap();
        }
        b.switch_to_block(join).unwrap();
        b.ret(None, sp()).unwrap();
    });

    let entry = lines(&package, "demo:f");
    assert_eq!(entry[0], "data modify storage mcc:runtime stack prepend value {}");
    assert_eq!(entry[1], "$scoreboard players set %r0 mcc.regs $(x)");
    assert_eq!(entry[2], "scoreboard players set %r1 mcc.regs 3");
    assert!(entry[3].starts_with("data modify storage mcc:runtime stack[0].t") && entry[3].ends_with(" set value 0b"));
    assert!(entry[4].starts_with("execute if score %r0 mcc.regs < %r1 mcc.regs run data modify storage mcc:runtime stack[0].t"));
    assert!(entry[5].starts_with("execute store result score %cond mcc.regs run data get storage mcc:runtime stack[0].t"));
    assert_eq!(entry[6], "$execute if score %cond mcc.regs matches 1.. run return run function demo:f/1 {x:$(x)}");
    assert_eq!(entry[7], "$return run function demo:f/2 {x:$(x)}");

    assert_eq!(lines(&package, "demo:f/1"), vec![
        "tellraw @a [\"lo\"]",
        "$return run function demo:f/3 {x:$(x)}",
    ]);
    assert_eq!(lines(&package, "demo:f/3"), vec!["data remove storage mcc:runtime stack[0]", "return 0"]);
}

#[test]
fn test_not_equal_uses_unless() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_global("g", tcx.boolean(), None, sp()).unwrap();
        b.create_function("f", vec![Parameter::by_value("x", tcx.integer())], tcx.void(), false, sp()).unwrap();
        let x = b.argument(0).unwrap();
        let zero = b.constant(Constant::Integer(0), sp()).unwrap();
        let cmp = b.comparison(ComparisonOp::Ne, x, zero, sp()).unwrap();
        let g = b.lookup_variable("g", sp()).unwrap();
        b.store(g, cmp, sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    let body = lines(&package, "demo:f");
    assert!(body.iter().any(|l| l.starts_with("execute unless score %r0 mcc.regs = %r1 mcc.regs run")));
}

#[test]
fn test_false_comparison_overwrites_true_variable() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("f", vec![Parameter::by_value("x", tcx.integer())], tcx.boolean(), false, sp()).unwrap();
        let x = b.argument(0).unwrap();
        let yes = b.constant(Constant::Boolean(true), sp()).unwrap();
        let flag = b.declare_variable("b", tcx.boolean(), true, Some(yes), sp()).unwrap();
        let five = b.constant(Constant::Integer(5), sp()).unwrap();
        let cmp = b.comparison(ComparisonOp::Gt, x, five, sp()).unwrap();
        b.store(flag, cmp, sp()).unwrap();
        b.ret(Some(flag), sp()).unwrap();
    });

    let body = lines(&package, "demo:f");
    let copy = body
        .iter()
        .position(|l| l.starts_with("data modify storage mcc:runtime stack[0].s0 set from storage mcc:runtime stack[0].t"))
        .unwrap();
    let temp = body[copy].rsplit(' ').next().unwrap().to_string();
    let reset = body.iter().position(|l| *l == format!("data modify storage mcc:runtime {temp} set value 0b")).unwrap();
    let test = body
        .iter()
        .position(|l| l.starts_with("execute if score %r0 mcc.regs > %r1 mcc.regs run") && l.ends_with(&format!("{temp} set value 1b")))
        .unwrap();
    assert!(body.iter().position(|l| l.ends_with("stack[0].s0 set value 1b")).unwrap() < reset);
    assert!(reset < test && test < copy);
}

#[test]
fn test_uncaught_failure_propagates() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("g", vec![], tcx.void(), true, sp()).unwrap();
        let boom = b.constant(Constant::from("boom"), sp()).unwrap();
        b.throw(boom, None, sp()).unwrap();

        b.create_function("main", vec![], tcx.void(), true, sp()).unwrap();
        b.call_by_name("g", vec![], None, sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    assert_eq!(lines(&package, "demo:g"), vec![
        "data modify storage mcc:runtime result set value \"boom\"",
        "return 1",
    ]);

    let main = lines(&package, "demo:main");
    assert_eq!(main[0], "data modify storage mcc:runtime stack prepend value {}");
    assert_eq!(main[1], "execute store result score %status mcc.regs run function demo:g");
    assert!(main[2].starts_with("execute store result storage mcc:runtime stack[0].f"));
    assert_eq!(main[3], "execute if score %status mcc.regs matches 1 run data remove storage mcc:runtime stack[0]");
    assert_eq!(main[4], "execute if score %status mcc.regs matches 1 run return 1");
    assert_eq!(&main[5..], &["data remove storage mcc:runtime stack[0]", "return 0"]);
}

#[test]
fn test_caught_failure_enters_landing_pad() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("g", vec![], tcx.void(), true, sp()).unwrap();
        let boom = b.constant(Constant::from("boom"), sp()).unwrap();
        b.throw(boom, None, sp()).unwrap();

        b.create_function("main", vec![], tcx.void(), false, sp()).unwrap();
        let pad = b.create_block().unwrap();
        b.call_by_name("g", vec![], Some(pad), sp()).unwrap();
        b.ret(None, sp()).unwrap();

        b.switch_to_block(pad).unwrap();
        let err = b.caught_exception(tcx.string(), sp()).unwrap();
        b.intrinsic("print", vec![err], sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    let main = lines(&package, "demo:main");
    assert!(main.iter().any(|l| l.starts_with("execute if data storage mcc:runtime stack[0]{f")
        && l.ends_with(":1b} run return run function demo:main/1")));
    assert!(!main.iter().any(|l| l.ends_with("run return 1")));

    let pad = lines(&package, "demo:main/1");
    assert_eq!(pad[0], "tellraw @a [{\"storage\":\"mcc:runtime\",\"nbt\":\"result\"}]");
}

#[test]
fn test_reference_arguments_pass_paths() {
    let tcx = TyCtx::new();
    let list = tcx.array_of(tcx.integer());
    let package = build(&tcx, |b| {
        b.create_function("push", vec![Parameter::by_reference("list", list, true)], tcx.void(), false, sp()).unwrap();
        let target = b.argument(0).unwrap();
        let one = b.constant(Constant::Integer(1), sp()).unwrap();
        b.mutate(target, MutateOp::Append, one, sp()).unwrap();
        b.ret(None, sp()).unwrap();

        b.create_function("push_framed", vec![Parameter::by_reference("list", list, true)], tcx.void(), false, sp()).unwrap();
        b.declare_variable("tmp", tcx.integer(), true, None, sp()).unwrap();
        b.ret(None, sp()).unwrap();

        b.create_function("main", vec![], tcx.void(), false, sp()).unwrap();
        let arr = b.declare_variable("arr", list, true, None, sp()).unwrap();
        b.call_by_name("push", vec![arr], None, sp()).unwrap();
        b.call_by_name("push_framed", vec![arr], None, sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    assert_eq!(lines(&package, "demo:push"), vec![
        "$data modify storage mcc:runtime $(list) append value 1",
        "return 0",
    ]);
    let main = lines(&package, "demo:main");
    assert_eq!(main[0], "data modify storage mcc:runtime stack prepend value {s0:[]}");
    assert!(main.contains(&String::from("function demo:push {list:\"stack[0].s0\"}")));
    assert!(main.contains(&String::from("function demo:push_framed {list:\"stack[1].s0\"}")));
}

#[test]
fn test_received_reference_is_forwarded_only_to_frameless_callees() {
    let tcx = TyCtx::new();
    let list = tcx.array_of(tcx.integer());
    let module = |forward_to: &'static str| {
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("push", vec![Parameter::by_reference("list", list, true)], tcx.void(), false, sp()).unwrap();
        b.ret(None, sp()).unwrap();

        b.create_function("push_framed", vec![Parameter::by_reference("list", list, true)], tcx.void(), false, sp()).unwrap();
        b.declare_variable("tmp", tcx.integer(), true, None, sp()).unwrap();
        b.ret(None, sp()).unwrap();

        b.create_function("relay", vec![Parameter::by_reference("list", list, true)], tcx.void(), false, sp()).unwrap();
        let received = b.argument(0).unwrap();
        b.call_by_name(forward_to, vec![received], None, sp()).unwrap();
        b.ret(None, sp()).unwrap();
        b.finish()
    };

    let package = generate(&module("push"), &tcx, &RuntimeLayout::default()).unwrap();
    assert_eq!(lines(&package, "demo:relay")[0], "$function demo:push {list:\"$(list)\"}");

    let err = generate(&module("push_framed"), &tcx, &RuntimeLayout::default()).unwrap_err();
    assert_eq!(err.code(), ErrCode::LOW2003);
}

#[test]
fn test_data_arguments_are_materialized() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_global("g", tcx.integer(), None, sp()).unwrap();
        b.create_function("show", vec![Parameter::by_value("n", tcx.integer())], tcx.void(), false, sp()).unwrap();
        b.ret(None, sp()).unwrap();

        b.create_function("main", vec![], tcx.void(), false, sp()).unwrap();
        let g = b.lookup_variable("g", sp()).unwrap();
        b.call_by_name("show", vec![g], None, sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    let main = lines(&package, "demo:main");
    let set = main.iter().find(|l| l.contains(".n set from")).expect("argument write");
    assert!(set.starts_with("data modify storage mcc:runtime stack[0].a"));
    assert!(set.ends_with(".n set from storage mcc:runtime globals.g"));
    let call = main.iter().find(|l| l.starts_with("function demo:show")).expect("call");
    assert!(call.starts_with("function demo:show with storage mcc:runtime stack[0].a"));
}

#[test]
fn test_used_return_value_is_copied() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("seven", vec![], tcx.integer(), false, sp()).unwrap();
        let seven = b.constant(Constant::Integer(7), sp()).unwrap();
        b.ret(Some(seven), sp()).unwrap();

        b.create_function("main", vec![], tcx.void(), false, sp()).unwrap();
        let value = b.call_by_name("seven", vec![], None, sp()).unwrap();
        b.declare_variable("y", tcx.integer(), true, Some(value), sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });

    assert_eq!(lines(&package, "demo:seven"), vec![
        "data modify storage mcc:runtime result set value 7",
        "return 0",
    ]);
    let main = lines(&package, "demo:main");
    let call = main.iter().position(|l| l == "function demo:seven").expect("call");
    assert!(main[call + 1].starts_with("data modify storage mcc:runtime stack[0].t"));
    assert!(main[call + 1].ends_with(" set from storage mcc:runtime result"));
}

#[test]
fn test_switch_cases_match_literals() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("pick", vec![Parameter::by_value("n", tcx.integer())], tcx.void(), false, sp()).unwrap();
        let n = b.argument(0).unwrap();
        let one = b.constant(Constant::Integer(1), sp()).unwrap();
        let case = b.create_block().unwrap();
        let default = b.create_block().unwrap();
        b.switch(n, vec![(one, case)], default, sp()).unwrap();
        for block in [case, default] {
            b.switch_to_block(block).unwrap();
            b.ret(None, sp()).unwrap();
        }
    });

    assert_eq!(lines(&package, "demo:pick"), vec![
        "$scoreboard players set %cond mcc.regs $(n)",
        "$execute if score %cond mcc.regs matches 1 run return run function demo:pick/1 {n:$(n)}",
        "$return run function demo:pick/2 {n:$(n)}",
    ]);
}

#[test]
fn test_switch_on_non_literal_case_fails() {
    let tcx = TyCtx::new();
    let mut b = IRBuilder::new(&tcx, "demo");
    b.create_function("pick", vec![Parameter::by_value("n", tcx.integer()), Parameter::by_value("m", tcx.integer())], tcx.void(), false, sp()).unwrap();
    let n = b.argument(0).unwrap();
    let m = b.argument(1).unwrap();
    let case = b.create_block().unwrap();
    let default = b.create_block().unwrap();
    b.switch(n, vec![(m, case)], default, sp()).unwrap();
    let module = b.finish();

    let err = generate(&module, &tcx, &RuntimeLayout::default()).unwrap_err();
    assert_eq!(err.code(), ErrCode::LOW2001);
}

#[test]
fn test_unterminated_block_returns_implicitly() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        b.create_function("noop", vec![], tcx.void(), false, sp()).unwrap();
        b.command("say hi", true, sp()).unwrap();
        b.command("data get storage mcc:runtime stack", false, sp()).unwrap();
    });
    assert_eq!(lines(&package, "demo:noop"), vec!["say hi", "return 0"]);
}

#[test]
fn test_function_tags_are_collected() {
    let tcx = TyCtx::new();
    let package = build(&tcx, |b| {
        let tick = b.create_function("tick", vec![], tcx.void(), false, sp()).unwrap();
        b.add_function_tag(tick, "minecraft:tick", sp()).unwrap();
        b.ret(None, sp()).unwrap();
    });
    let tag: ResourceLocation = "minecraft:tick".parse().unwrap();
    assert_eq!(package.tags[&tag].len(), 1);
}

#[test]
fn test_generation_is_deterministic() {
    let tcx = TyCtx::new();
    let mut b = IRBuilder::new(&tcx, "demo");
    b.create_global("g", tcx.integer(), None, sp()).unwrap();
    b.create_function("f", vec![Parameter::by_value("x", tcx.integer())], tcx.void(), false, sp()).unwrap();
    let x = b.argument(0).unwrap();
    let g = b.lookup_variable("g", sp()).unwrap();
    let sum = b.operation(OperationOp::Mul, vec![x, g], sp()).unwrap();
    let g2 = b.lookup_variable("g", sp()).unwrap();
    b.store(g2, sum, sp()).unwrap();
    b.ret(None, sp()).unwrap();
    let module = b.finish();

    let layout = RuntimeLayout::default();
    let first = generate(&module, &tcx, &layout).unwrap();
    let second = generate(&module, &tcx, &layout).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
}
