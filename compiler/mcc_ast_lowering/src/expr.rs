// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_ast::*;
use mcc_const::{ComparisonOp, Constant, OperationOp};
use mcc_mir::{BuildResult, ValueId};
use mcc_span::Span;

use crate::ast_to_mir::{AstToMirLowerer, ExprLoweringResult};
use crate::loop_ctx::FrameCtx;

impl<'tcx> AstToMirLowerer<'tcx> {
    pub fn lower_expression(&mut self, expr: &Expr, ctx: FrameCtx) -> ExprLoweringResult {
        let span = expr.span;
        match &expr.kind {
            ExprKind::LitVal(lit) => self.ir_builder.constant(lit.value.clone(), span),
            ExprKind::Ident(ident) => self.ir_builder.lookup_variable(&ident.sym_name, span),
            ExprKind::Binary(bin) => self.lower_binary_expr(expr, bin, ctx),
            ExprKind::Unary(unary) => self.lower_unary_expr(unary, ctx, span),
            ExprKind::FuncCall(call) => self.lower_function_call_expr(call, ctx, span),
            ExprKind::Member(member) => {
                let base = self.lower_expression(&member.base, ctx)?;
                self.ir_builder.member(base, &member.name, span)
            },
            ExprKind::Subscript(subscript) => {
                let base = self.lower_expression(&subscript.base, ctx)?;
                let index = self.lower_expression(&subscript.index, ctx)?;
                self.ir_builder.index(base, index, span)
            },
            ExprKind::Take(take) => {
                let list = self.lower_expression(&take.list, ctx)?;
                let index = self.lower_expression(&take.index, ctx)?;
                self.ir_builder.extract(list, index, span)
            },
            ExprKind::Intrinsic(intrinsic) => {
                let args = self.lower_arguments(&intrinsic.args, ctx)?;
                self.ir_builder.intrinsic(&intrinsic.name, args, span)
            }
        }
    }

    fn lower_arguments(&mut self, args: &[Expr], ctx: FrameCtx) -> BuildResult<Vec<ValueId>> {
        args.iter().map(|arg| self.lower_expression(arg, ctx)).collect()
    }

    fn lower_binary_expr(&mut self, expr: &Expr, bin: &BinExpr, ctx: FrameCtx) -> ExprLoweringResult {
        let span = expr.span;
        if bin.operation.is_logical() {
            return self.lower_logical_expr(bin, ctx, span);
        }
        if let Some(op) = bin.operation.as_comparison() {
            let lhs = self.lower_expression(&bin.left, ctx)?;
            let rhs = self.lower_expression(&bin.right, ctx)?;
            return self.ir_builder.comparison(op, lhs, rhs, span);
        }

        let Some(op) = bin.operation.as_operation() else {
            mcc_utils::bug!("binary operator {:?} is neither arithmetic, comparison nor logical", bin.operation);
        };
        let mut operands = vec![];
        collect_operands(expr, bin.operation, &mut operands);
        let values = operands
            .into_iter()
            .map(|operand| self.lower_expression(operand, ctx))
            .collect::<BuildResult<Vec<_>>>()?;
        self.ir_builder.operation(op, values, span)
    }

    /// `a && b` and `a || b` evaluate `b` only when needed, joining both
    /// paths through a branch result slot.
    fn lower_logical_expr(&mut self, bin: &BinExpr, ctx: FrameCtx, span: Span) -> ExprLoweringResult {
        let is_and = bin.operation == AstOp::And;
        let lhs = self.lower_expression(&bin.left, ctx)?;

        let known = self.ir_builder
            .current_function()
            .and_then(|f| self.ir_builder.function(f))
            .and_then(|f| f.value(lhs))
            .and_then(|v| v.as_constant())
            .and_then(Constant::as_bool);
        match known {
            Some(value) if value != is_and => return Ok(lhs),
            Some(_) => return self.lower_expression(&bin.right, ctx),
            None => {}
        }

        let tcx = self.ir_builder.tcx();
        let result = self.ir_builder.create_branch_result(tcx.boolean(), span)?;
        let rhs_block = self.ir_builder.create_block()?;
        let short_block = self.ir_builder.create_block()?;
        let merge_block = self.ir_builder.create_block()?;

        if is_and {
            self.ir_builder.branch(lhs, rhs_block, short_block, span)?;
        } else {
            self.ir_builder.branch(lhs, short_block, rhs_block, span)?;
        }

        self.ir_builder.switch_to_block(short_block)?;
        let short_value = self.ir_builder.constant(Constant::Boolean(!is_and), span)?;
        self.ir_builder.direct_jump_with(merge_block, short_value, result, span)?;

        self.ir_builder.switch_to_block(rhs_block)?;
        let rhs = self.lower_expression(&bin.right, ctx)?;
        self.ir_builder.direct_jump_with(merge_block, rhs, result, span)?;

        self.ir_builder.switch_to_block(merge_block)?;
        Ok(result)
    }

    /// `!(a < b)` becomes `a >= b`; any other `!x` compares `x` with `0b`.
    fn lower_unary_expr(&mut self, unary: &UnaryExpr, ctx: FrameCtx, span: Span) -> ExprLoweringResult {
        if unary.operation == UnaryOp::Not {
            if let Some((op, bin)) = unary.operand.as_binary().and_then(|bin| Some((bin.operation.as_comparison()?, bin))) {
                let lhs = self.lower_expression(&bin.left, ctx)?;
                let rhs = self.lower_expression(&bin.right, ctx)?;
                return self.ir_builder.comparison(op.negate(), lhs, rhs, span);
            }
        }

        let operand = self.lower_expression(&unary.operand, ctx)?;
        match unary.operation {
            UnaryOp::Negate => {
                let zero = self.ir_builder.constant(Constant::Integer(0), span)?;
                self.ir_builder.operation(OperationOp::Sub, vec![zero, operand], span)
            },
            UnaryOp::Not => {
                let falsy = self.ir_builder.constant(Constant::Boolean(false), span)?;
                self.ir_builder.comparison(ComparisonOp::Eq, operand, falsy, span)
            }
        }
    }

    /// Calls bind the enclosing landing pad only when the callee can fail.
    fn lower_function_call_expr(&mut self, call: &FuncCallExpr, ctx: FrameCtx, span: Span) -> ExprLoweringResult {
        let args = self.lower_arguments(&call.args, ctx)?;
        let module = self.ir_builder.module();
        let throws = module
            .function_by_name(&call.symbol_name)
            .and_then(|id| module.function(id))
            .is_some_and(|f| f.throws);
        let landing_pad = if throws { ctx.landing_pad } else { None };
        self.ir_builder.call_by_name(&call.symbol_name, args, landing_pad, span)
    }
}

/// Flattens a chain of the same operator into one operand list. The left
/// spine is always flattened; a right operand of the same operator only
/// when the operator is associative.
fn collect_operands<'e>(expr: &'e Expr, op: AstOp, out: &mut Vec<&'e Expr>) {
    match expr.as_binary() {
        Some(bin) if bin.operation == op => {
            collect_operands(&bin.left, op, out);
            let associative = op.as_operation().is_some_and(OperationOp::is_associative);
            match bin.right.as_binary() {
                Some(right) if associative && right.operation == op => collect_operands(&bin.right, op, out),
                _ => out.push(&bin.right)
            }
        },
        _ => out.push(expr)
    }
}
