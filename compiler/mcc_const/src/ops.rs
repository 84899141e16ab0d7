// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Arithmetic operators that reduce two or more operands left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl OperationOp {
    /// Operator token used by `scoreboard players operation`.
    pub fn score_operator(self) -> &'static str {
        match self {
            OperationOp::Add => "+=",
            OperationOp::Sub => "-=",
            OperationOp::Mul => "*=",
            OperationOp::Div => "/=",
            OperationOp::Rem => "%=",
        }
    }

    /// `(a op b) op c == a op (b op c)`
    pub fn is_associative(self) -> bool {
        matches!(self, OperationOp::Add | OperationOp::Mul)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl ComparisonOp {
    /// Returns the `execute` keyword and relational token for a score test.
    /// `Ne` has no token of its own and is expressed as `unless ... =`.
    pub fn score_test(self) -> (&'static str, &'static str) {
        match self {
            ComparisonOp::Lt => ("if", "<"),
            ComparisonOp::Le => ("if", "<="),
            ComparisonOp::Eq => ("if", "="),
            ComparisonOp::Ne => ("unless", "="),
            ComparisonOp::Ge => ("if", ">="),
            ComparisonOp::Gt => ("if", ">"),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Lt => ComparisonOp::Ge,
            ComparisonOp::Le => ComparisonOp::Gt,
            ComparisonOp::Eq => ComparisonOp::Ne,
            ComparisonOp::Ne => ComparisonOp::Eq,
            ComparisonOp::Ge => ComparisonOp::Lt,
            ComparisonOp::Gt => ComparisonOp::Le,
        }
    }
}
