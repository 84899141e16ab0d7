// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc::compiler::CompilerPipeline;
use mcc::{compile_program, render_error};
use mcc::options::CompilerOptionsBuilder;
use mcc_ast::*;
use mcc_codegen::Package;
use mcc_errors::ErrCode;
use mcc_span::Span;
use mcc_mir::analyzer::verify_use_counts;
use mcc_mir::opt::fusion::find_fusible_pair;
use mcc_mir::opt::BlockOptimizer;
use mcc_mir::RuntimeLayoutBuilder;
use mcc_ast_lowering::AstToMirLowerer;
use mcc_types::TyCtx;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn program(functions: Vec<FuncDeclStmt>) -> Program {
    Program { globals: vec![], functions }
}

fn lines(package: &Package, location: &str) -> Vec<String> {
    package
        .lines(location)
        .unwrap_or_else(|| panic!("no procedure {location} in\n{}", package.render()))
        .to_vec()
}

fn s(text: &str) -> String {
    text.to_string()
}

#[test]
fn test_constant_sum_is_folded() {
    init_logging();
    let tcx = TyCtx::new();
    let body = vec![Stmt::var("x", tcx.integer(), false, Some(Expr::binary(AstOp::Add, Expr::lit(2), Expr::lit(3))))];
    let package = compile_program(&tcx, &program(vec![FuncDeclStmt::new("main", vec![], tcx.void(), body)]), "demo").unwrap();

    let main = lines(&package, "demo:main");
    assert!(main.contains(&s("data modify storage mcc:runtime stack[0].s0 set value 5")));
    assert!(!main.iter().any(|l| l.contains("scoreboard players operation")));
}

#[test]
fn test_if_else_returns_compile_to_two_tail_calls() {
    init_logging();
    let tcx = TyCtx::new();
    let body = vec![Stmt::if_else(
        Expr::binary(AstOp::GThan, Expr::ident("x"), Expr::lit(0)),
        vec![Stmt::ret(Some(Expr::lit(1)))],
        Some(vec![Stmt::ret(Some(Expr::lit(0)))])
    )];
    let sign = FuncDeclStmt::new("sign", vec![ParamDecl::value("x", tcx.integer())], tcx.integer(), body);
    let package = compile_program(&tcx, &program(vec![sign]), "demo").unwrap();

    let blocks = package.functions.keys().filter(|loc| loc.to_string().starts_with("demo:sign")).count();
    assert_eq!(blocks, 3);

    let entry = lines(&package, "demo:sign");
    let n = entry.len();
    assert_eq!(entry[n - 2], "$execute if score %cond mcc.regs matches 1.. run return run function demo:sign/1 {x:$(x)}");
    assert_eq!(entry[n - 1], "$return run function demo:sign/2 {x:$(x)}");

    assert_eq!(lines(&package, "demo:sign/1"), vec![
        s("data modify storage mcc:runtime result set value 1"),
        s("data remove storage mcc:runtime stack[0]"),
        s("return 0"),
    ]);
    assert_eq!(lines(&package, "demo:sign/2")[0], "data modify storage mcc:runtime result set value 0");
}

#[test]
fn test_literal_only_function_has_no_frame() {
    init_logging();
    let tcx = TyCtx::new();
    let one = FuncDeclStmt::new("one", vec![], tcx.integer(), vec![Stmt::ret(Some(Expr::lit(1)))]);
    let package = compile_program(&tcx, &program(vec![one]), "demo").unwrap();

    assert_eq!(lines(&package, "demo:one"), vec![
        s("data modify storage mcc:runtime result set value 1"),
        s("return 0"),
    ]);
}

#[test]
fn test_doubled_variable_is_loaded_once() {
    init_logging();
    let tcx = TyCtx::new();
    let body = vec![
        Stmt::var("a", tcx.integer(), false, Some(Expr::lit(1))),
        Stmt::var("b", tcx.integer(), false, Some(Expr::binary(AstOp::Add, Expr::ident("a"), Expr::ident("a")))),
    ];
    let package = compile_program(&tcx, &program(vec![FuncDeclStmt::new("main", vec![], tcx.void(), body)]), "demo").unwrap();

    let main = lines(&package, "demo:main");
    let loads = main.iter().filter(|l| l.starts_with("execute store result score")).count();
    assert_eq!(loads, 1);
    assert!(main.contains(&s("execute store result score %r0 mcc.regs run data get storage mcc:runtime stack[0].s0")));
    assert!(main.contains(&s("scoreboard players operation %r0 mcc.regs += %r0 mcc.regs")));
    assert!(!main.iter().any(|l| l.contains("%r1")));
}

#[test]
fn test_uncaught_throw_propagates_failure() {
    init_logging();
    let tcx = TyCtx::new();
    let fail = FuncDeclStmt::new("fail", vec![], tcx.void(), vec![Stmt::throw(Expr::lit("nope"))]).throwing();
    let main = FuncDeclStmt::new("main", vec![], tcx.void(), vec![
        Stmt::expr(Expr::call("fail", vec![])),
        Stmt::command("say survived"),
    ]).throwing();
    let package = compile_program(&tcx, &program(vec![fail, main]), "demo").unwrap();

    let main = lines(&package, "demo:main");
    let status = main.iter().position(|l| l == "execute if score %status mcc.regs matches 1 run return 1").unwrap();
    assert!(main[..status].iter().any(|l| l == "execute store result score %status mcc.regs run function demo:fail"));
    assert!(!main.iter().any(|l| l.starts_with("execute if data")));
    assert!(main[status + 1..].contains(&s("say survived")));
}

#[test]
fn test_caught_throw_runs_the_handler() {
    init_logging();
    let tcx = TyCtx::new();
    let fail = FuncDeclStmt::new("fail", vec![], tcx.void(), vec![Stmt::throw(Expr::lit("nope"))]).throwing();
    let main = FuncDeclStmt::new("main", vec![], tcx.void(), vec![Stmt::try_catch(
        vec![Stmt::expr(Expr::call("fail", vec![]))],
        "err",
        tcx.string(),
        vec![Stmt::expr(Expr::intrinsic("print", vec![Expr::ident("err")]))]
    )]);
    let package = compile_program(&tcx, &program(vec![fail, main]), "demo").unwrap();

    let entry = lines(&package, "demo:main");
    let pad_call = entry.iter().find(|l| l.starts_with("execute if data storage mcc:runtime stack[0]{f")).unwrap();
    let pad = pad_call.rsplit(' ').next().unwrap();
    let handler = lines(&package, pad);
    assert_eq!(handler[0], "data modify storage mcc:runtime stack[0].s0 set from storage mcc:runtime result");
    assert_eq!(handler[1], "tellraw @a [{\"storage\":\"mcc:runtime\",\"nbt\":\"stack[0].s0\"}]");
}

#[test]
fn test_optimizer_fuses_straight_line_blocks() {
    init_logging();
    let tcx = TyCtx::new();
    let body = vec![
        Stmt::try_catch(vec![Stmt::command("say inside")], "e", tcx.string(), vec![]),
        Stmt::command("say after"),
    ];
    let prog = program(vec![FuncDeclStmt::new("main", vec![], tcx.void(), body)]);

    let optimized = compile_program(&tcx, &prog, "demo").unwrap();
    assert_eq!(optimized.functions.keys().filter(|l| l.to_string().starts_with("demo:main")).count(), 1);
    let main = lines(&optimized, "demo:main");
    let inside = main.iter().position(|l| l == "say inside").unwrap();
    let after = main.iter().position(|l| l == "say after").unwrap();
    assert!(inside < after);

    let options = CompilerOptionsBuilder::new("demo").optimize(false).build();
    let plain = CompilerPipeline::new(options).compile(&tcx, &prog).unwrap();
    assert!(plain.lines("demo:main/1").is_some());
}

#[test]
fn test_use_counts_survive_optimization() {
    init_logging();
    let tcx = TyCtx::new();
    let body = vec![
        Stmt::var("i", tcx.integer(), true, Some(Expr::lit(0))),
        Stmt::while_loop(Expr::binary(AstOp::LThan, Expr::ident("i"), Expr::lit(3)), vec![
            Stmt::assign(Expr::ident("i"), Expr::binary(AstOp::Add, Expr::ident("i"), Expr::lit(1))),
            Stmt::if_else(
                Expr::binary(AstOp::Or, Expr::binary(AstOp::EqEq, Expr::ident("i"), Expr::lit(2)), Expr::ident("flag")),
                vec![Stmt::new(StmtKind::Continue)],
                None
            ),
            Stmt::command("say tick"),
        ]),
    ];
    let func = FuncDeclStmt::new("main", vec![ParamDecl::value("flag", tcx.boolean())], tcx.void(), body);
    let mut module = AstToMirLowerer::new(&tcx, "demo").lower(&program(vec![func])).unwrap();

    for func in &module.functions {
        assert_eq!(verify_use_counts(func), Ok(()));
    }
    let first = BlockOptimizer::run_module(&mut module);
    for func in &module.functions {
        assert_eq!(verify_use_counts(func), Ok(()));
    }
    for func in &module.functions {
        assert_eq!(find_fusible_pair(func), None);
    }
    let second = BlockOptimizer::run_module(&mut module);
    assert_eq!(second.erased + second.fused, 0);
    assert!(first.rounds >= 1);
}

#[test]
fn test_output_is_deterministic() {
    init_logging();
    let tcx = TyCtx::new();
    let body = vec![
        Stmt::var("list", tcx.array_of(tcx.integer()), true, None),
        Stmt::list(Expr::ident("list"), ListOp::Append, Expr::ident("n")),
        Stmt::switch(Expr::ident("n"), vec![
            (mcc_const::Constant::Integer(1), vec![Stmt::command("say one")]),
        ], vec![Stmt::command("say many")]),
    ];
    let func = FuncDeclStmt::new("main", vec![ParamDecl::value("n", tcx.integer())], tcx.void(), body).tagged("minecraft:tick");
    let prog = Program {
        globals: vec![GlobalDeclStmt::new("count", tcx.integer(), Some(mcc_const::Constant::Integer(3)))],
        functions: vec![func],
    };

    let first = compile_program(&tcx, &prog, "demo").unwrap();
    let second = compile_program(&tcx, &prog, "demo").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
    assert!(first.lines("demo:__init").unwrap().contains(&s("data modify storage mcc:runtime globals.count set value 3")));
}

#[test]
fn test_custom_layout_is_honoured() {
    init_logging();
    let tcx = TyCtx::new();
    let layout = RuntimeLayoutBuilder::new().storage("demo:vm").objective("demo.regs").build();
    let options = CompilerOptionsBuilder::new("demo").layout(layout).build();
    let one = FuncDeclStmt::new("one", vec![], tcx.integer(), vec![Stmt::ret(Some(Expr::lit(1)))]);
    let package = CompilerPipeline::new(options).compile(&tcx, &program(vec![one])).unwrap();

    assert_eq!(lines(&package, "demo:one")[0], "data modify storage demo:vm result set value 1");
    assert_eq!(lines(&package, "demo:__init")[0], "scoreboard objectives add demo.regs dummy");
}

#[test]
fn test_first_error_stops_the_pipeline() {
    init_logging();
    let tcx = TyCtx::new();
    let missing = Expr::ident("missing").at(Span::point(3, 7));
    let main = FuncDeclStmt::new("main", vec![], tcx.void(), vec![Stmt::expr(missing)]);
    let err = compile_program(&tcx, &program(vec![main]), "demo").unwrap_err();
    assert_eq!(err.code(), ErrCode::UNR3000);
    assert_eq!(err.span(), Span::point(3, 7));
}

#[test]
fn test_user_function_cannot_take_a_block_procedure_name() {
    init_logging();
    let tcx = TyCtx::new();
    let branching = || FuncDeclStmt::new("f", vec![ParamDecl::value("x", tcx.integer())], tcx.void(), vec![Stmt::if_else(
        Expr::binary(AstOp::GThan, Expr::ident("x"), Expr::lit(0)),
        vec![Stmt::command("say pos")],
        Some(vec![Stmt::command("say neg")])
    )]);
    let impostor = || FuncDeclStmt::new("f/1", vec![], tcx.void(), vec![Stmt::command("say user f/1")]);

    let err = compile_program(&tcx, &program(vec![branching(), impostor()]), "demo").unwrap_err();
    assert_eq!(err.code(), ErrCode::CON1002);
    let err = compile_program(&tcx, &program(vec![impostor(), branching()]), "demo").unwrap_err();
    assert_eq!(err.code(), ErrCode::CON1002);
}

#[test]
fn test_user_function_cannot_replace_the_init_procedure() {
    init_logging();
    let tcx = TyCtx::new();
    let init = FuncDeclStmt::new("__init", vec![], tcx.void(), vec![Stmt::command("say mine")]);
    let err = compile_program(&tcx, &program(vec![init]), "demo").unwrap_err();
    assert_eq!(err.code(), ErrCode::CON1002);
}

#[test]
fn test_failure_renders_as_a_diagnostic() {
    init_logging();
    let tcx = TyCtx::new();
    let missing = Expr::ident("missing").at(Span::point(1, 8));
    let main = FuncDeclStmt::new("main", vec![], tcx.void(), vec![Stmt::var("y", tcx.integer(), false, Some(missing))]);
    let err = compile_program(&tcx, &program(vec![main]), "demo").unwrap_err();

    let rendered = render_error(&err, "main.mcs", "let y = missing;");
    assert!(rendered.starts_with("Error[UNR3000]: cannot resolve 'missing'"));
    assert!(rendered.contains(" --> main.mcs:1:9"));
    assert!(rendered.contains("   1 | let y = missing;"));
}
