// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::Constant;
use mcc_span::{HasSpan, Span};

use crate::{AstOp, UnaryOp};

/// A binary expression AST node.
#[derive(Clone, Debug, PartialEq)]
pub struct BinExpr {
    pub operation: AstOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub operation: UnaryOp,
    pub operand: Box<Expr>,
}

/// A identifier expression AST node.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentExpr {
    /// Name of the variable, global or function
    pub sym_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LitValExpr {
    pub value: Constant,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncCallExpr {
    /// Name of the called function
    pub symbol_name: String,
    pub args: Vec<Expr>,
}

/// `base.name`
#[derive(Clone, Debug, PartialEq)]
pub struct MemberExpr {
    pub base: Box<Expr>,
    pub name: String,
}

/// `base[index]`
#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptExpr {
    pub base: Box<Expr>,
    pub index: Box<Expr>,
}

/// Removes `list[index]` and evaluates to it.
#[derive(Clone, Debug, PartialEq)]
pub struct TakeExpr {
    pub list: Box<Expr>,
    pub index: Box<Expr>,
}

/// A built-in such as `print` or `swap`.
#[derive(Clone, Debug, PartialEq)]
pub struct IntrinsicExpr {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Binary(BinExpr),
    Unary(UnaryExpr),
    Ident(IdentExpr),
    LitVal(LitValExpr),
    FuncCall(FuncCallExpr),
    Member(MemberExpr),
    Subscript(SubscriptExpr),
    Take(TakeExpr),
    Intrinsic(IntrinsicExpr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl HasSpan for Expr {
    fn span(&self) -> &Span {
        &self.span
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, span: Span::default() }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn lit(value: impl Into<Constant>) -> Self {
        Self::new(ExprKind::LitVal(LitValExpr { value: value.into() }))
    }

    pub fn ident(name: &str) -> Self {
        Self::new(ExprKind::Ident(IdentExpr { sym_name: name.to_string() }))
    }

    pub fn binary(operation: AstOp, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Binary(BinExpr {
            operation,
            left: Box::new(left),
            right: Box::new(right)
        }))
    }

    pub fn unary(operation: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary(UnaryExpr { operation, operand: Box::new(operand) }))
    }

    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::FuncCall(FuncCallExpr { symbol_name: name.to_string(), args }))
    }

    pub fn member(base: Expr, name: &str) -> Self {
        Self::new(ExprKind::Member(MemberExpr { base: Box::new(base), name: name.to_string() }))
    }

    pub fn subscript(base: Expr, index: Expr) -> Self {
        Self::new(ExprKind::Subscript(SubscriptExpr { base: Box::new(base), index: Box::new(index) }))
    }

    pub fn take(list: Expr, index: Expr) -> Self {
        Self::new(ExprKind::Take(TakeExpr { list: Box::new(list), index: Box::new(index) }))
    }

    pub fn intrinsic(name: &str, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Intrinsic(IntrinsicExpr { name: name.to_string(), args }))
    }

    pub fn as_binary(&self) -> Option<&BinExpr> {
        match &self.kind {
            ExprKind::Binary(bin) => Some(bin),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_keep_operand_order() {
        let expr = Expr::binary(AstOp::Subtract, Expr::ident("a"), Expr::lit(1));
        let bin = expr.as_binary().unwrap();
        assert_eq!(*bin.left, Expr::ident("a"));
        assert_eq!(*bin.right, Expr::lit(Constant::Integer(1)));
    }

    #[test]
    fn test_at_sets_span() {
        let span = Span::point(3, 4);
        assert_eq!(*Expr::ident("x").at(span).span(), span);
    }
}
