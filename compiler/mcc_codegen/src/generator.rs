// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, trace};

use mcc_const::ResourceLocation;
use mcc_errors::{CompileError, ErrCode};
use mcc_mir::analyzer::frame_table;
use mcc_mir::instruction::{AllocationKind, IRInstruction};
use mcc_mir::result::IRResult;
use mcc_mir::{BlockId, Function, FunctionId, LowerResult, Module, RuntimeLayout, ValueId, ValueKind};
use mcc_span::Span;
use mcc_types::TyCtx;

use crate::format::macro_object;
use crate::package::Package;
use crate::CodeGenerator;

/// Per-function state of the generator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FnCtx {
    pub(crate) has_frame: bool,
}

/// Lowers a whole module into a [`Package`] of command procedures.
pub struct CommandGenerator<'m> {
    pub(crate) module: &'m Module,
    pub(crate) tcx: &'m TyCtx,
    pub(crate) layout: &'m RuntimeLayout,

    /// Frame decision of every function, known before any of them is
    /// generated so calls can rebase reference arguments.
    pub(crate) frames: IndexMap<FunctionId, bool>,

    fn_ctx: Option<FnCtx>,
}

impl<'m> CommandGenerator<'m> {
    pub fn new(module: &'m Module, tcx: &'m TyCtx, layout: &'m RuntimeLayout) -> Self {
        Self {
            module,
            tcx,
            layout,
            frames: frame_table(module),
            fn_ctx: None
        }
    }

    /// Generates every function, then the init procedure and tags.
    pub fn generate(&mut self) -> LowerResult<Package> {
        let mut package = Package::new();
        for func in &self.module.functions {
            self.gen_function(func, &mut package)?;
        }
        self.gen_init(&mut package)?;
        debug!("generated {} procedure(s) for namespace '{}'", package.functions.len(), self.module.namespace);
        Ok(package)
    }

    fn gen_init(&self, package: &mut Package) -> LowerResult<()> {
        let location = self.module.init_location().ok_or_else(|| {
            CompileError::lowering(ErrCode::LOW2000, Span::default(), format!("invalid namespace '{}'", self.module.namespace))
        })?;
        let storage = &self.layout.storage;

        let mut lines = vec![
            format!("scoreboard objectives add {} dummy", self.layout.objective),
            format!("data modify storage {storage} {} set value []", self.layout.stack),
            format!("data modify storage {storage} {} set value {{}}", self.layout.globals),
        ];
        for global in self.module.globals.values() {
            let value = global.initializer.clone().or_else(|| self.tcx.default_value(global.ty));
            if let Some(value) = value {
                lines.push(format!(
                    "data modify storage {storage} {} set value {}",
                    self.layout.global_path(&global.name),
                    value.to_snbt()
                ));
            }
        }
        package.add_function(location.clone(), lines, Span::default())?;

        let load_tag = ResourceLocation::new("minecraft", "load").map_err(|err| {
            CompileError::lowering(ErrCode::LOW2000, Span::default(), err.to_string())
        })?;
        package.tag(load_tag, location);
        Ok(())
    }

    pub(crate) fn has_frame(&self) -> bool {
        self.fn_ctx.is_some_and(|ctx| ctx.has_frame)
    }

    pub(crate) fn callee_has_frame(&self, function: FunctionId) -> bool {
        self.frames.get(&function).copied().unwrap_or(false)
    }

    /// Result of `id` as it is written into data commands.
    pub(crate) fn result(&self, func: &Function, id: ValueId) -> LowerResult<IRResult> {
        func.generate_result(id, self.layout, false)
    }

    /// `storage <storage> <path>`
    pub(crate) fn storage(&self, path: &str) -> String {
        format!("storage {} {path}", self.layout.storage)
    }

    /// `function <block>` with the function's macro arguments forwarded.
    /// The flag tells whether the text has to go on a macro line.
    pub(crate) fn block_invocation(&self, func: &Function, block: BlockId, span: Span) -> LowerResult<(String, bool)> {
        let location = func.block_location(block).ok_or_else(|| {
            CompileError::lowering(ErrCode::LOW2000, span, "jump to an erased block")
        })?;
        let forwarded = func
            .parameters
            .iter()
            .map(|p| (p.name.clone(), mcc_mir::result::macro_placeholder(&p.name, p.quoted)))
            .collect::<Vec<_>>();
        Ok((format!("function {location}{}", macro_object(&forwarded)), !forwarded.is_empty()))
    }

    /// Discards the current frame if the function pushed one.
    pub(crate) fn pop_frame(&self, out: &mut Vec<String>) {
        if self.has_frame() {
            out.push(format!("data remove {}", self.storage(&self.layout.frame(0))));
        }
    }

    fn frame_push(&self, func: &Function) -> String {
        let mut slots: IndexMap<usize, &'static str> = (0..func.stack_slot_counter).map(|s| (s, "0")).collect();
        for (_, _, inst) in func.instructions() {
            if let IRInstruction::Allocation { slot, kind } = inst {
                slots.insert(*slot, kind.initial_snbt());
            }
        }
        let body = slots.iter().map(|(slot, init)| format!("s{slot}:{init}")).join(",");
        format!("data modify {} prepend value {{{body}}}", self.storage(&self.layout.stack))
    }

    fn gen_allocation(&self, slot: usize, kind: AllocationKind, out: &mut Vec<String>) {
        out.push(format!(
            "data modify {} set value {}",
            self.storage(&self.layout.slot_path(slot)),
            kind.initial_snbt()
        ));
    }
}

impl<'m> CodeGenerator for CommandGenerator<'m> {
    fn gen_function(&mut self, func: &Function, package: &mut Package) -> LowerResult<()> {
        let has_frame = self.callee_has_frame(func.id);
        self.fn_ctx = Some(FnCtx { has_frame });
        debug!("generating {} ({} block(s), frame: {has_frame})", func.location, func.block_order.len());

        for &block in &func.block_order {
            let lines = self.gen_block(func, block)?;
            let location = func.block_location(block).ok_or_else(|| {
                CompileError::lowering(ErrCode::LOW2000, func.span, "block has no location")
            })?;
            package.add_function(location, lines, func.span)?;
        }
        for tag in &func.tags {
            package.tag(tag.clone(), func.location.clone());
        }

        self.fn_ctx = None;
        Ok(())
    }

    fn gen_block(&mut self, func: &Function, block: BlockId) -> LowerResult<Vec<String>> {
        let mut out = vec![];
        if block == func.entry() && self.has_frame() {
            out.push(self.frame_push(func));
        }

        let instructions = func
            .block(block)
            .map(|b| b.instructions.clone())
            .ok_or_else(|| CompileError::lowering(ErrCode::LOW2000, func.span, "generating an erased block"))?;
        for id in instructions {
            self.gen_instruction(func, id, &mut out)?;
        }

        if !func.is_terminated(block) {
            self.pop_frame(&mut out);
            out.push(String::from("return 0"));
        }
        Ok(out)
    }

    fn gen_instruction(&mut self, func: &Function, id: ValueId, out: &mut Vec<String>) -> LowerResult<()> {
        let Some(value) = func.value(id) else {
            return Err(CompileError::lowering(ErrCode::LOW2000, func.span, "block lists an erased instruction"));
        };
        let ValueKind::Instruction(inst) = &value.kind else {
            return Err(CompileError::lowering(ErrCode::LOW2000, value.span, "block lists a non-instruction value"));
        };
        if inst.is_elidable() && value.use_count() == 0 {
            trace!("elided unused {inst:?}");
            return Ok(());
        }

        let span = value.span;
        match inst {
            IRInstruction::Allocation { slot, kind } => {
                self.gen_allocation(*slot, *kind, out);
                Ok(())
            },
            IRInstruction::Operation { op, operands } => self.lower_operation(func, id, *op, operands, span, out),
            IRInstruction::Comparison { op, lhs, rhs } => self.lower_comparison(func, id, *op, *lhs, *rhs, span, out),
            IRInstruction::Branch { cond, then_block, else_block } => {
                self.lower_branch(func, *cond, *then_block, *else_block, span, out)
            },
            IRInstruction::Switch { cond, cases, default } => self.lower_switch(func, *cond, cases, *default, span, out),
            IRInstruction::DirectJump { target, phi } => self.lower_jump(func, *target, phi.as_ref(), span, out),
            IRInstruction::Return { value } => self.lower_return(func, *value, out),
            IRInstruction::Throw { value, landing_pad } => self.lower_throw(func, *value, *landing_pad, span, out),
            IRInstruction::Call { callee, args, landing_pad, inline_args } => {
                self.lower_call(func, id, callee, args, *landing_pad, *inline_args, value.use_count(), span, out)
            },
            IRInstruction::Store { dst, src } => self.lower_store(func, *dst, *src, span, out),
            IRInstruction::Member { .. } | IRInstruction::Index { .. } => Ok(()),
            IRInstruction::Mutate { target, op, value } => self.lower_mutate(func, *target, *op, *value, span, out),
            IRInstruction::Extract { target, index } => self.lower_extract(func, id, *target, *index, span, out),
            IRInstruction::Remove { target } => self.lower_remove(func, *target, span, out),
            IRInstruction::Intrinsic { kind, args } => self.lower_intrinsic(func, *kind, args, span, out),
            IRInstruction::Command { text, .. } => {
                out.push(text.clone());
                Ok(())
            }
        }
    }
}

/// Generates `module` with the given layout.
pub fn generate(module: &Module, tcx: &TyCtx, layout: &RuntimeLayout) -> LowerResult<Package> {
    CommandGenerator::new(module, tcx, layout).generate()
}

#[cfg(test)]
mod tests {
    use mcc_mir::{IRBuilder, Parameter};

    use super::*;

    #[test]
    fn test_string_parameters_are_forwarded_quoted() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        let params = vec![Parameter::by_value("n", tcx.integer()), Parameter::by_value("s", tcx.string())];
        b.create_function("f", params, tcx.void(), false, Span::default()).unwrap();
        let next = b.create_block().unwrap();
        b.direct_jump(next, Span::default()).unwrap();
        let module = b.finish();

        let layout = RuntimeLayout::default();
        let generator = CommandGenerator::new(&module, &tcx, &layout);
        let func = &module.functions[0];
        let (text, with_argument) = generator.block_invocation(func, next, Span::default()).unwrap();
        assert_eq!(text, "function demo:f/1 {n:$(n),s:\"$(s)\"}");
        assert!(with_argument);
    }

    #[test]
    fn test_frame_push_uses_allocation_shapes() {
        let tcx = TyCtx::new();
        let mut b = IRBuilder::new(&tcx, "demo");
        b.create_function("f", vec![], tcx.void(), false, Span::default()).unwrap();
        b.declare_variable("n", tcx.integer(), true, None, Span::default()).unwrap();
        b.declare_variable("list", tcx.array_of(tcx.integer()), true, None, Span::default()).unwrap();
        b.create_branch_result(tcx.integer(), Span::default()).unwrap();
        let module = b.finish();

        let layout = RuntimeLayout::default();
        let generator = CommandGenerator::new(&module, &tcx, &layout);
        assert_eq!(
            generator.frame_push(&module.functions[0]),
            "data modify storage mcc:runtime stack prepend value {s0:0,s1:[],s2:0}"
        );
    }
}
