// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod compiler;
pub mod options;

use mcc_ast::Program;
use mcc_codegen::Package;
use mcc_errors::{CompileError, Diagnostic};
use mcc_types::TyCtx;

use compiler::CompilerPipeline;
use options::CompilerOptionsBuilder;

/// Compiles `program` into namespace `namespace` with default options.
pub fn compile_program(tcx: &TyCtx, program: &Program, namespace: &str) -> Result<Package, CompileError> {
    let options = CompilerOptionsBuilder::new(namespace).build();
    CompilerPipeline::new(options).compile(tcx, program)
}

/// Renders `err` against the source text at `path`, caret under the span.
pub fn render_error(err: &CompileError, path: &str, source: &str) -> String {
    Diagnostic::from(err).render(path, source)
}
