// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use log::{debug, error, info};

use mcc_ast::Program;
use mcc_ast_lowering::AstToMirLowerer;
use mcc_codegen::{CommandGenerator, Package};
use mcc_errors::{CompileError, Diagnostic};
use mcc_mir::analyzer::verify_use_counts;
use mcc_mir::opt::BlockOptimizer;
use mcc_mir::Module;
use mcc_types::TyCtx;

use crate::options::CompilerOptions;

/// Trees → block graph → optimized graph → command package. The first
/// error stops the pipeline and no package is produced.
#[derive(Debug, Clone)]
pub struct CompilerPipeline {
    pub options: CompilerOptions,
}

impl CompilerPipeline {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn compile(&self, tcx: &TyCtx, program: &Program) -> Result<Package, CompileError> {
        info!("compiling {} function(s) into '{}'", program.functions.len(), self.options.namespace);
        AstToMirLowerer::new(tcx, &self.options.namespace)
            .lower(program)
            .and_then(|module| self.compile_module(tcx, module))
            .map_err(|err| {
                let diag = Diagnostic::from(&err);
                error!("{:?} at {}: {}", diag.severity, diag.primary_span, diag.message);
                err
            })
    }

    /// Runs the back half of the pipeline on an already built module.
    pub fn compile_module(&self, tcx: &TyCtx, mut module: Module) -> Result<Package, CompileError> {
        if self.options.optimize {
            let stats = BlockOptimizer::run_module(&mut module);
            debug!("optimizer erased {} and fused {} block(s)", stats.erased, stats.fused);
        }
        for func in &module.functions {
            debug_assert!(verify_use_counts(func).is_ok(), "use counts of {} drifted", func.location);
        }
        CommandGenerator::new(&module, tcx, &self.options.layout).generate()
    }
}
