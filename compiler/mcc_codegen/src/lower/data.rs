// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_errors::{CompileError, ErrCode};
use mcc_mir::arena::ArenaKey;
use mcc_mir::instruction::MutateOp;
use mcc_mir::result::{IRResult, ResultKind};
use mcc_mir::{Function, LowerResult, ValueId};
use mcc_span::Span;

use crate::format::{data_source, data_target, line};
use crate::generator::CommandGenerator;

impl<'m> CommandGenerator<'m> {
    pub(crate) fn lower_store(&self, func: &Function, dst: ValueId, src: ValueId, span: Span, out: &mut Vec<String>) -> LowerResult<()> {
        let dst = self.result(func, dst)?;
        let src = self.result(func, src)?;
        out.push(line(
            dst.with_argument || src.with_argument,
            format!("data modify {} set {}", data_target(&dst, span)?, data_source(&src))
        ));
        Ok(())
    }

    pub(crate) fn lower_mutate(
        &self,
        func: &Function,
        target: ValueId,
        op: MutateOp,
        value: ValueId,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        let target = self.result(func, target)?;
        let value = self.result(func, value)?;
        let verb = match op {
            MutateOp::Append => String::from("append"),
            MutateOp::Prepend => String::from("prepend"),
            MutateOp::Insert(index) => format!("insert {index}"),
            MutateOp::Merge => String::from("merge")
        };
        out.push(line(
            target.with_argument || value.with_argument,
            format!("data modify {} {verb} {}", data_target(&target, span)?, data_source(&value))
        ));
        Ok(())
    }

    /// Copies `target[index]` into the temporary, then deletes it from
    /// the list.
    pub(crate) fn lower_extract(
        &self,
        func: &Function,
        id: ValueId,
        target: ValueId,
        index: ValueId,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        let list = self.result(func, target)?;
        let index = self.result(func, index)?;
        let suffix = match &index.kind {
            ResultKind::Literal(text) => format!("[{text}]"),
            ResultKind::MacroArgument { name, quoted: false } => format!("[$({name})]"),
            _ => return Err(CompileError::lowering(ErrCode::LOW2000, span, "list index must be a literal or a macro argument"))
        };
        let with_argument = list.with_argument || index.with_argument;
        let element: IRResult = list
            .extend_path(&suffix)
            .ok_or_else(|| CompileError::lowering(ErrCode::LOW2000, span, "cannot extract from a non-reference"))?;
        let element = data_target(&element, span)?;

        out.push(line(with_argument, format!(
            "data modify {} set from {element}",
            self.storage(&self.layout.temp_path(id.index()))
        )));
        out.push(line(with_argument, format!("data remove {element}")));
        Ok(())
    }

    pub(crate) fn lower_remove(&self, func: &Function, target: ValueId, span: Span, out: &mut Vec<String>) -> LowerResult<()> {
        let target = self.result(func, target)?;
        out.push(line(target.with_argument, format!("data remove {}", data_target(&target, span)?)));
        Ok(())
    }
}
