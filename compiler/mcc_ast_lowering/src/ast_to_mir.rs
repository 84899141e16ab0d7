// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use log::debug;

use mcc_ast::*;
use mcc_errors::{CompileError, ErrCode};
use mcc_mir::instruction::MutateOp;
use mcc_mir::{BlockId, BuildResult, FunctionId, IRBuilder, Module, Parameter, ValueId};
use mcc_span::Span;
use mcc_types::TyCtx;

use crate::loop_ctx::FrameCtx;

/// Expression lowering result
pub(crate) type ExprLoweringResult = BuildResult<ValueId>;

/// Statement lowering result
pub(crate) type StmtLoweringResult = BuildResult<()>;

/// `AstToMirLowerer` turns statement trees into the block graph of a
/// [`Module`], going through the builder for every mutation.
pub struct AstToMirLowerer<'tcx> {
    /// Public builder; holds the module and the insertion point.
    pub ir_builder: IRBuilder<'tcx>,
}

impl<'tcx> AstToMirLowerer<'tcx> {
    pub fn new(tcx: &'tcx TyCtx, namespace: &str) -> Self {
        Self { ir_builder: IRBuilder::new(tcx, namespace) }
    }

    /// Lowers a whole program. Every signature is declared before any body
    /// so calls may refer to functions defined later.
    pub fn lower(mut self, program: &Program) -> BuildResult<Module> {
        for global in &program.globals {
            self.ir_builder.create_global(&global.name, global.ty, global.value.clone(), global.span)?;
        }

        let mut ids = Vec::with_capacity(program.functions.len());
        for func in &program.functions {
            ids.push(self.declare_function(func)?);
        }
        for (func, id) in program.functions.iter().zip(ids) {
            self.lower_function(func, id)?;
        }
        Ok(self.ir_builder.finish())
    }

    fn declare_function(&mut self, func: &FuncDeclStmt) -> BuildResult<FunctionId> {
        let params = func
            .params
            .iter()
            .map(|p| {
                if p.by_ref {
                    Parameter::by_reference(&p.name, p.ty, p.mutable)
                } else {
                    Parameter::by_value(&p.name, p.ty)
                }
            })
            .collect();
        let id = self.ir_builder.create_function(&func.name, params, func.ty, func.throws, func.span)?;
        for tag in &func.tags {
            self.ir_builder.add_function_tag(id, tag, func.span)?;
        }
        Ok(id)
    }

    fn lower_function(&mut self, func: &FuncDeclStmt, id: FunctionId) -> StmtLoweringResult {
        debug!("lowering body of '{}'", func.name);
        self.ir_builder.switch_to_function(id)?;
        self.lower_linear_sequence(&func.body, FrameCtx::default())?;

        let current = self.current_block(func.span)?;
        if !self.ir_builder.is_terminated(current) {
            self.ir_builder.ret(None, func.span)?;
        }
        Ok(())
    }

    pub(crate) fn current_block(&self, span: Span) -> BuildResult<BlockId> {
        self.ir_builder
            .current_block()
            .ok_or_else(|| CompileError::construction(ErrCode::CON1000, span, "no insertion block"))
    }

    /// Jumps to `target` unless the current block already left.
    fn close_with_jump(&mut self, target: BlockId, span: Span) -> StmtLoweringResult {
        let current = self.current_block(span)?;
        if !self.ir_builder.is_terminated(current) {
            self.ir_builder.direct_jump(target, span)?;
        }
        Ok(())
    }

    pub fn lower_linear_sequence(&mut self, stmts: &[Stmt], ctx: FrameCtx) -> StmtLoweringResult {
        for stmt in stmts {
            // Code after return/break/throw goes into an unreachable block
            // that the optimizer removes.
            let current = self.current_block(stmt.span)?;
            if self.ir_builder.is_terminated(current) {
                let continuation = self.ir_builder.create_block()?;
                self.ir_builder.switch_to_block(continuation)?;
            }
            self.lower_stmt(stmt, ctx)?;
        }
        Ok(())
    }

    fn lower_scoped(&mut self, stmts: &[Stmt], ctx: FrameCtx) -> StmtLoweringResult {
        self.ir_builder.push_scope()?;
        self.lower_linear_sequence(stmts, ctx)?;
        self.ir_builder.pop_scope()
    }

    pub fn lower_stmt(&mut self, stmt: &Stmt, ctx: FrameCtx) -> StmtLoweringResult {
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                let value = match &decl.value {
                    Some(expr) => Some(self.lower_expression(expr, ctx)?),
                    None => None
                };
                self.ir_builder.declare_variable(&decl.sym_name, decl.ty, decl.mutable, value, span)?;
                Ok(())
            },
            StmtKind::Assign(assign) => {
                let dst = self.lower_expression(&assign.target, ctx)?;
                let src = self.lower_expression(&assign.value, ctx)?;
                self.ir_builder.store(dst, src, span)?;
                Ok(())
            },
            StmtKind::Expr(expr) => {
                self.lower_expression(expr, ctx)?;
                Ok(())
            },
            StmtKind::If(if_stmt) => self.lower_if_else_tree(if_stmt, ctx, span),
            StmtKind::While(while_stmt) => self.lower_while_loop(while_stmt, ctx, span),
            StmtKind::Break | StmtKind::Continue => {
                let Some(loop_ctx) = ctx.loop_ctx else {
                    return Err(CompileError::construction(ErrCode::CON1000, span, "'break' or 'continue' outside of a loop"));
                };
                let target = if matches!(stmt.kind, StmtKind::Break) { loop_ctx.exit_block } else { loop_ctx.head_block };
                self.ir_builder.direct_jump(target, span)?;
                Ok(())
            },
            StmtKind::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => Some(self.lower_expression(expr, ctx)?),
                    None => None
                };
                self.ir_builder.ret(value, span)?;
                Ok(())
            },
            StmtKind::Throw(throw) => {
                let value = self.lower_expression(&throw.value, ctx)?;
                self.ir_builder.throw(value, ctx.landing_pad, span)?;
                Ok(())
            },
            StmtKind::Try(try_stmt) => self.lower_try_catch(try_stmt, ctx, span),
            StmtKind::Switch(switch) => self.lower_switch(switch, ctx, span),
            StmtKind::List(list) => {
                let target = self.lower_expression(&list.target, ctx)?;
                let value = self.lower_expression(&list.value, ctx)?;
                let op = match list.operation {
                    ListOp::Append => MutateOp::Append,
                    ListOp::Prepend => MutateOp::Prepend,
                    ListOp::Insert(index) => MutateOp::Insert(index),
                    ListOp::Merge => MutateOp::Merge
                };
                self.ir_builder.mutate(target, op, value, span)?;
                Ok(())
            },
            StmtKind::Remove(target) => {
                let target = self.lower_expression(target, ctx)?;
                self.ir_builder.remove(target, span)?;
                Ok(())
            },
            StmtKind::Block(stmts) => self.lower_scoped(stmts, ctx),
            StmtKind::Command(text) => {
                self.ir_builder.command(text, true, span)?;
                Ok(())
            }
        }
    }

    fn lower_if_else_tree(&mut self, if_stmt: &IfStmt, ctx: FrameCtx, span: Span) -> StmtLoweringResult {
        let cond = self.lower_expression(&if_stmt.cond, ctx)?;

        let then_block = self.ir_builder.create_block()?;
        let else_block = match if_stmt.else_body {
            Some(_) => Some(self.ir_builder.create_block()?),
            None => None
        };
        let merge_block = self.ir_builder.create_block()?;
        self.ir_builder.branch(cond, then_block, else_block.unwrap_or(merge_block), span)?;

        self.ir_builder.switch_to_block(then_block)?;
        self.lower_scoped(&if_stmt.then_body, ctx)?;
        self.close_with_jump(merge_block, span)?;

        if let (Some(else_block), Some(else_body)) = (else_block, &if_stmt.else_body) {
            self.ir_builder.switch_to_block(else_block)?;
            self.lower_scoped(else_body, ctx)?;
            self.close_with_jump(merge_block, span)?;
        }

        self.ir_builder.switch_to_block(merge_block)
    }

    fn lower_while_loop(&mut self, while_stmt: &WhileStmt, ctx: FrameCtx, span: Span) -> StmtLoweringResult {
        let head_block = self.ir_builder.create_block()?;
        let body_block = self.ir_builder.create_block()?;
        let exit_block = self.ir_builder.create_block()?;

        self.ir_builder.direct_jump(head_block, span)?;
        self.ir_builder.switch_to_block(head_block)?;
        let cond = self.lower_expression(&while_stmt.cond, ctx)?;
        self.ir_builder.branch(cond, body_block, exit_block, span)?;

        self.ir_builder.switch_to_block(body_block)?;
        self.lower_scoped(&while_stmt.body, ctx.enter_loop(head_block, exit_block))?;
        self.close_with_jump(head_block, span)?;

        self.ir_builder.switch_to_block(exit_block)
    }

    /// The handler becomes the landing pad of every throw and throwing
    /// call in the body. The caught value is copied into a local before
    /// anything else can overwrite the result slot.
    fn lower_try_catch(&mut self, try_stmt: &TryStmt, ctx: FrameCtx, span: Span) -> StmtLoweringResult {
        let landing_pad = self.ir_builder.create_block()?;
        let merge_block = self.ir_builder.create_block()?;

        self.lower_scoped(&try_stmt.body, ctx.enter_try(landing_pad))?;
        self.close_with_jump(merge_block, span)?;

        self.ir_builder.switch_to_block(landing_pad)?;
        self.ir_builder.push_scope()?;
        let caught = self.ir_builder.caught_exception(try_stmt.catch_ty, span)?;
        self.ir_builder.declare_variable(&try_stmt.catch_name, try_stmt.catch_ty, false, Some(caught), span)?;
        self.lower_linear_sequence(&try_stmt.handler, ctx)?;
        self.ir_builder.pop_scope()?;
        self.close_with_jump(merge_block, span)?;

        self.ir_builder.switch_to_block(merge_block)
    }

    fn lower_switch(&mut self, switch: &SwitchStmt, ctx: FrameCtx, span: Span) -> StmtLoweringResult {
        let cond = self.lower_expression(&switch.cond, ctx)?;

        let mut cases = Vec::with_capacity(switch.cases.len());
        for (value, _) in &switch.cases {
            let case_value = self.ir_builder.constant(value.clone(), span)?;
            cases.push((case_value, self.ir_builder.create_block()?));
        }
        let default_block = self.ir_builder.create_block()?;
        let merge_block = self.ir_builder.create_block()?;
        self.ir_builder.switch(cond, cases.clone(), default_block, span)?;

        for ((_, body), (_, block)) in switch.cases.iter().zip(cases) {
            self.ir_builder.switch_to_block(block)?;
            self.lower_scoped(body, ctx)?;
            self.close_with_jump(merge_block, span)?;
        }
        self.ir_builder.switch_to_block(default_block)?;
        self.lower_scoped(&switch.default, ctx)?;
        self.close_with_jump(merge_block, span)?;

        self.ir_builder.switch_to_block(merge_block)
    }
}
