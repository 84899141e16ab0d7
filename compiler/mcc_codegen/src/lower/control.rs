// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_errors::{CompileError, ErrCode};
use mcc_mir::instruction::PhiWrite;
use mcc_mir::{BlockId, Function, LowerResult, ValueId};
use mcc_span::Span;

use crate::format::{data_source, data_target, line, literal_int, score_load};
use crate::generator::CommandGenerator;
use crate::registers::REG_COND;

impl<'m> CommandGenerator<'m> {
    /// `return run function <block>`, the tail call that ends a block.
    fn tail_call(&self, func: &Function, block: BlockId, span: Span) -> LowerResult<String> {
        let (invocation, with_argument) = self.block_invocation(func, block, span)?;
        Ok(line(with_argument, format!("return run {invocation}")))
    }

    fn load_condition(&self, func: &Function, cond: ValueId, span: Span, out: &mut Vec<String>) -> LowerResult<()> {
        let result = self.result(func, cond)?;
        out.push(score_load(&REG_COND.name, &self.layout.objective, &result, span)?);
        Ok(())
    }

    pub(crate) fn lower_branch(
        &self,
        func: &Function,
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        self.load_condition(func, cond, span, out)?;

        let (then_call, with_argument) = self.block_invocation(func, then_block, span)?;
        out.push(line(with_argument, format!(
            "execute if score {} {} matches 1.. run return run {then_call}",
            *REG_COND,
            self.layout.objective
        )));
        out.push(self.tail_call(func, else_block, span)?);
        Ok(())
    }

    pub(crate) fn lower_switch(
        &self,
        func: &Function,
        cond: ValueId,
        cases: &[(ValueId, BlockId)],
        default: BlockId,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        self.load_condition(func, cond, span, out)?;

        for (case, block) in cases {
            let value = self.result(func, *case)?;
            let Some(value) = literal_int(&value) else {
                return Err(CompileError::lowering(ErrCode::LOW2001, span, "switch case is not an integer literal"));
            };
            let (call, with_argument) = self.block_invocation(func, *block, span)?;
            out.push(line(with_argument, format!(
                "execute if score {} {} matches {value} run return run {call}",
                *REG_COND,
                self.layout.objective
            )));
        }
        out.push(self.tail_call(func, default, span)?);
        Ok(())
    }

    pub(crate) fn lower_jump(
        &self,
        func: &Function,
        target: BlockId,
        phi: Option<&PhiWrite>,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        if let Some(phi) = phi {
            let dst = self.result(func, phi.slot)?;
            let src = self.result(func, phi.value)?;
            out.push(line(
                dst.with_argument || src.with_argument,
                format!("data modify {} set {}", data_target(&dst, span)?, data_source(&src))
            ));
        }
        out.push(self.tail_call(func, target, span)?);
        Ok(())
    }

    fn write_result(&self, func: &Function, value: ValueId, out: &mut Vec<String>) -> LowerResult<()> {
        let src = self.result(func, value)?;
        out.push(line(
            src.with_argument,
            format!("data modify {} set {}", self.storage(&self.layout.result), data_source(&src))
        ));
        Ok(())
    }

    pub(crate) fn lower_return(&self, func: &Function, value: Option<ValueId>, out: &mut Vec<String>) -> LowerResult<()> {
        if let Some(value) = value {
            self.write_result(func, value, out)?;
        }
        self.pop_frame(out);
        out.push(String::from("return 0"));
        Ok(())
    }

    /// A caught throw jumps into the landing pad with the frame still in
    /// place. An uncaught one unwinds the frame and reports failure.
    pub(crate) fn lower_throw(
        &self,
        func: &Function,
        value: ValueId,
        landing_pad: Option<BlockId>,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        self.write_result(func, value, out)?;
        match landing_pad {
            Some(pad) => out.push(self.tail_call(func, pad, span)?),
            None => {
                self.pop_frame(out);
                out.push(String::from("return 1"));
            }
        }
        Ok(())
    }
}
