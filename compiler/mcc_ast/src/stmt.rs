// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::Constant;
use mcc_span::{HasSpan, Span};
use mcc_types::Ty;

use crate::{Expr, ListOp};

#[derive(Clone, Debug, PartialEq)]
pub struct VarDeclStmt {
    pub sym_name: String,
    pub ty: Ty,
    pub mutable: bool,
    pub value: Option<Expr>,
}

/// `target = value`, where the target is a variable, global, member or
/// subscript.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignStmt {
    pub target: Expr,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Option<Vec<Stmt>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThrowStmt {
    pub value: Expr,
}

/// `try { body } catch (name: ty) { handler }`
#[derive(Clone, Debug, PartialEq)]
pub struct TryStmt {
    pub body: Vec<Stmt>,
    pub catch_name: String,
    pub catch_ty: Ty,
    pub handler: Vec<Stmt>,
}

/// Integer switch; cases do not fall through.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchStmt {
    pub cond: Expr,
    pub cases: Vec<(Constant, Vec<Stmt>)>,
    pub default: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListStmt {
    pub target: Expr,
    pub operation: ListOp,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    Expr(Expr),
    If(IfStmt),
    While(WhileStmt),
    Break,
    Continue,
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Try(TryStmt),
    Switch(SwitchStmt),
    List(ListStmt),

    /// Deletes the data at the target path.
    Remove(Expr),

    /// A nested scope.
    Block(Vec<Stmt>),

    /// Raw command text, emitted as is.
    Command(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl HasSpan for Stmt {
    fn span(&self) -> &Span {
        &self.span
    }
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, span: Span::default() }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn var(name: &str, ty: Ty, mutable: bool, value: Option<Expr>) -> Self {
        Self::new(StmtKind::VarDecl(VarDeclStmt {
            sym_name: name.to_string(),
            ty,
            mutable,
            value
        }))
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::new(StmtKind::Assign(AssignStmt { target, value }))
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr(expr))
    }

    pub fn if_else(cond: Expr, then_body: Vec<Stmt>, else_body: Option<Vec<Stmt>>) -> Self {
        Self::new(StmtKind::If(IfStmt { cond, then_body, else_body }))
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Self::new(StmtKind::While(WhileStmt { cond, body }))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(ReturnStmt { value }))
    }

    pub fn throw(value: Expr) -> Self {
        Self::new(StmtKind::Throw(ThrowStmt { value }))
    }

    pub fn try_catch(body: Vec<Stmt>, catch_name: &str, catch_ty: Ty, handler: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Try(TryStmt {
            body,
            catch_name: catch_name.to_string(),
            catch_ty,
            handler
        }))
    }

    pub fn switch(cond: Expr, cases: Vec<(Constant, Vec<Stmt>)>, default: Vec<Stmt>) -> Self {
        Self::new(StmtKind::Switch(SwitchStmt { cond, cases, default }))
    }

    pub fn list(target: Expr, operation: ListOp, value: Expr) -> Self {
        Self::new(StmtKind::List(ListStmt { target, operation, value }))
    }

    pub fn command(text: &str) -> Self {
        Self::new(StmtKind::Command(text.to_string()))
    }
}
