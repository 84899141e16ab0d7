// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::{ComparisonOp, OperationOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LThan,
    LtEq,
    EqEq,
    NEq,
    GtEq,
    GThan,

    /// Short-circuiting `&&`
    And,

    /// Short-circuiting `||`
    Or,
}

impl AstOp {
    pub fn as_operation(self) -> Option<OperationOp> {
        match self {
            AstOp::Add => Some(OperationOp::Add),
            AstOp::Subtract => Some(OperationOp::Sub),
            AstOp::Multiply => Some(OperationOp::Mul),
            AstOp::Divide => Some(OperationOp::Div),
            AstOp::Modulo => Some(OperationOp::Rem),
            _ => None
        }
    }

    pub fn as_comparison(self) -> Option<ComparisonOp> {
        match self {
            AstOp::LThan => Some(ComparisonOp::Lt),
            AstOp::LtEq => Some(ComparisonOp::Le),
            AstOp::EqEq => Some(ComparisonOp::Eq),
            AstOp::NEq => Some(ComparisonOp::Ne),
            AstOp::GtEq => Some(ComparisonOp::Ge),
            AstOp::GThan => Some(ComparisonOp::Gt),
            _ => None
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, AstOp::And | AstOp::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

/// In-place list/compound updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOp {
    Append,
    Prepend,
    Insert(i32),
    Merge,
}
