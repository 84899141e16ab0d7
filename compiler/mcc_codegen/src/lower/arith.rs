// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::{ComparisonOp, OperationOp};
use mcc_mir::arena::ArenaKey;
use mcc_mir::result::IRResult;
use mcc_mir::{Function, LowerResult, ValueId};
use mcc_span::Span;

use crate::format::{literal_int, score_load};
use crate::generator::CommandGenerator;
use crate::registers::{ScoreRegister, REG_ACC, REG_AUX};

impl<'m> CommandGenerator<'m> {
    fn load(&self, reg: &ScoreRegister, result: &IRResult, span: Span) -> LowerResult<String> {
        score_load(&reg.name, &self.layout.objective, result, span)
    }

    /// Reduces the operands into the accumulator, then stores it into the
    /// instruction's temporary.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn lower_operation(
        &self,
        func: &Function,
        id: ValueId,
        op: OperationOp,
        operands: &[ValueId],
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        let results = operands.iter().map(|o| self.result(func, *o)).collect::<LowerResult<Vec<_>>>()?;
        let Some((first, rest)) = results.split_first() else {
            return Ok(());
        };
        let objective = &self.layout.objective;

        out.push(self.load(&REG_ACC, first, span)?);
        let mut acc_holds = Some(first);
        let mut aux_holds: Option<&IRResult> = None;

        for operand in rest {
            if let Some(step) = add_sub_step(op, operand) {
                out.push(format!("scoreboard players {step} {} {objective}", *REG_ACC));
                acc_holds = None;
                continue;
            }

            let source = if acc_holds == Some(operand) {
                &*REG_ACC
            } else if aux_holds == Some(operand) {
                &*REG_AUX
            } else {
                out.push(self.load(&REG_AUX, operand, span)?);
                aux_holds = Some(operand);
                &*REG_AUX
            };
            out.push(format!(
                "scoreboard players operation {} {objective} {} {source} {objective}",
                *REG_ACC,
                op.score_operator()
            ));
            acc_holds = None;
        }

        out.push(format!(
            "execute store result {} int 1 run scoreboard players get {} {objective}",
            self.storage(&self.layout.temp_path(id.index())),
            *REG_ACC
        ));
        Ok(())
    }

    /// Resets the temporary to `0b`, then writes `1b` when the comparison
    /// holds. Consumers copying the temporary always find a value.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn lower_comparison(
        &self,
        func: &Function,
        id: ValueId,
        op: ComparisonOp,
        lhs: ValueId,
        rhs: ValueId,
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        let objective = &self.layout.objective;
        let left = self.result(func, lhs)?;
        let right = self.result(func, rhs)?;

        out.push(self.load(&REG_ACC, &left, span)?);
        let right_reg = if left == right {
            &*REG_ACC
        } else {
            out.push(self.load(&REG_AUX, &right, span)?);
            &*REG_AUX
        };

        let temp = self.storage(&self.layout.temp_path(id.index()));
        let (verb, relation) = op.score_test();
        out.push(format!("data modify {temp} set value 0b"));
        out.push(format!(
            "execute {verb} score {} {objective} {relation} {right_reg} {objective} run data modify {temp} set value 1b",
            *REG_ACC
        ));
        Ok(())
    }
}

/// `add n`/`remove n` for an integer literal added or subtracted.
fn add_sub_step(op: OperationOp, operand: &IRResult) -> Option<String> {
    let amount = literal_int(operand)?;
    if amount == i32::MIN {
        return None;
    }
    let step = match (op, amount >= 0) {
        (OperationOp::Add, true) | (OperationOp::Sub, false) => format!("add {}", amount.abs()),
        (OperationOp::Sub, true) | (OperationOp::Add, false) => format!("remove {}", amount.abs()),
        _ => return None
    };
    Some(step)
}
