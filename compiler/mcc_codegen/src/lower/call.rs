// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use log::trace;

use mcc_errors::{CompileError, ErrCode};
use mcc_mir::arena::ArenaKey;
use mcc_mir::instruction::CallTarget;
use mcc_mir::result::{macro_placeholder, IRResult, ResultKind};
use mcc_mir::{BlockId, Function, LowerResult, ValueId};
use mcc_span::Span;

use crate::format::{data_source, line, macro_object};
use crate::generator::CommandGenerator;
use crate::registers::REG_STATUS;

impl<'m> CommandGenerator<'m> {
    /// Path string handed to a reference parameter. Paths into the stack
    /// are rebased when the callee pushes its own frame. A path received
    /// as `$(p)` is only known at run time and can only be forwarded to a
    /// frameless callee.
    fn reference_argument(&self, callee: &CallTarget, result: &IRResult, span: Span) -> LowerResult<String> {
        match &result.kind {
            ResultKind::Reference { target, path, .. } if *target == self.layout.storage => {
                let path = match (self.callee_has_frame(callee.function), result.with_argument) {
                    (false, _) => path.clone(),
                    (true, false) => self.layout.rebase(path),
                    (true, true) => {
                        return Err(CompileError::lowering(
                            ErrCode::LOW2003,
                            span,
                            format!("received reference '{path}' cannot be forwarded to '{}', which pushes a frame", callee.location)
                        ));
                    }
                };
                Ok(format!("\"{path}\""))
            },
            _ => Err(CompileError::lowering(
                ErrCode::LOW2000,
                span,
                format!("reference argument of '{}' must live in runtime storage", callee.location)
            ))
        }
    }

    /// Text of a by-value argument inside a literal macro object.
    fn inline_argument(&self, result: &IRResult, span: Span) -> LowerResult<String> {
        match &result.kind {
            ResultKind::Literal(text) => Ok(text.clone()),
            ResultKind::MacroArgument { name, quoted } => Ok(macro_placeholder(name, *quoted)),
            ResultKind::Reference { .. } => {
                Err(CompileError::lowering(ErrCode::LOW2000, span, "data reference cannot be passed inline"))
            }
        }
    }

    /// Builds the invocation text, writing materialized arguments into
    /// the frame first when they cannot be inlined.
    #[allow(clippy::too_many_arguments)]
    fn call_invocation(
        &self,
        func: &Function,
        id: ValueId,
        callee: &CallTarget,
        args: &[ValueId],
        inline_args: bool,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<(String, bool)> {
        let location = &callee.location;
        if args.is_empty() {
            return Ok((format!("function {location}"), false));
        }

        if inline_args {
            let mut with_argument = false;
            let mut entries = vec![];
            for (param, arg) in callee.params.iter().zip(args) {
                let result = self.result(func, *arg)?;
                with_argument |= result.with_argument;
                let text = if param.field_kind.is_reference() {
                    self.reference_argument(callee, &result, span)?
                } else {
                    self.inline_argument(&result, span)?
                };
                entries.push((param.name.clone(), text));
            }
            return Ok((format!("function {location}{}", macro_object(&entries)), with_argument));
        }

        let args_path = self.layout.args_path(id.index());
        for (param, arg) in callee.params.iter().zip(args) {
            let result = self.result(func, *arg)?;
            let source = if param.field_kind.is_reference() {
                format!("value {}", self.reference_argument(callee, &result, span)?)
            } else {
                data_source(&result)
            };
            out.push(line(
                result.with_argument,
                format!("data modify {} set {source}", self.storage(&format!("{args_path}.{}", param.name)))
            ));
        }
        Ok((format!("function {location} with {}", self.storage(&args_path)), false))
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn lower_call(
        &self,
        func: &Function,
        id: ValueId,
        callee: &CallTarget,
        args: &[ValueId],
        landing_pad: Option<BlockId>,
        inline_args: bool,
        use_count: usize,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        let (invocation, with_argument) = self.call_invocation(func, id, callee, args, inline_args, span, out)?;
        let objective = &self.layout.objective;

        if callee.throws {
            let status = &*REG_STATUS;
            let flag = self.layout.flag_key(id.index());
            out.push(line(with_argument, format!("execute store result score {status} {objective} run {invocation}")));
            out.push(format!(
                "execute store result {} byte 1 run scoreboard players get {status} {objective}",
                self.storage(&format!("{}.{flag}", self.layout.frame(0)))
            ));
            match landing_pad {
                Some(pad) => {
                    let (pad_call, pad_argument) = self.block_invocation(func, pad, span)?;
                    out.push(line(pad_argument, format!(
                        "execute if data {}{{{flag}:1b}} run return run {pad_call}",
                        self.storage(&self.layout.frame(0))
                    )));
                },
                None => {
                    if self.has_frame() {
                        out.push(format!(
                            "execute if score {status} {objective} matches 1 run data remove {}",
                            self.storage(&self.layout.frame(0))
                        ));
                    }
                    out.push(format!("execute if score {status} {objective} matches 1 run return 1"));
                }
            }
        } else {
            out.push(line(with_argument, invocation));
        }

        if callee.returns_value && use_count > 0 {
            trace!("copying result of {} into t{}", callee.location, id.index());
            out.push(format!(
                "data modify {} set from {}",
                self.storage(&self.layout.temp_path(id.index())),
                self.storage(&self.layout.result)
            ));
        }
        Ok(())
    }
}
