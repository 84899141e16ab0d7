// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Constant folding. Integer semantics follow scoreboard arithmetic:
//! 32-bit wrapping, division and remainder rounded toward negative infinity.

use thiserror::Error;

use crate::constant::Constant;
use crate::ops::{ComparisonOp, OperationOp};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("integer division by zero")]
    DivisionByZero,
}

/// Folds `lhs op rhs`. `Ok(None)` means the pair is not foldable and the
/// operation must be emitted.
pub fn fold_binary(op: OperationOp, lhs: &Constant, rhs: &Constant) -> Result<Option<Constant>, FoldError> {
    let folded = match (lhs, rhs) {
        (Constant::Integer(a), Constant::Integer(b)) => Some(Constant::Integer(fold_int(op, *a, *b)?)),
        (Constant::Integer(_) | Constant::Float(_), Constant::Integer(_) | Constant::Float(_)) => {
            let (a, b) = (as_f64(lhs), as_f64(rhs));
            Some(Constant::Float(fold_float(op, a, b)))
        },
        (Constant::String(a), Constant::String(b)) if op == OperationOp::Add => {
            Some(Constant::String(format!("{a}{b}")))
        },
        _ => None
    };
    Ok(folded)
}

/// Reduces all operands left to right. Stops at the first unfoldable pair.
pub fn fold_operands(op: OperationOp, operands: &[&Constant]) -> Result<Option<Constant>, FoldError> {
    let Some((first, rest)) = operands.split_first() else {
        return Ok(None);
    };
    let mut acc = (*first).clone();
    for operand in rest {
        match fold_binary(op, &acc, operand)? {
            Some(next) => acc = next,
            None => return Ok(None)
        }
    }
    Ok(Some(acc))
}

/// Folds a comparison. Ordering is only defined between numbers; equality
/// also holds between any two constants of the same kind.
pub fn fold_comparison(op: ComparisonOp, lhs: &Constant, rhs: &Constant) -> Option<bool> {
    if lhs.is_numeric() && rhs.is_numeric() {
        let (a, b) = (as_f64(lhs), as_f64(rhs));
        let result = match op {
            ComparisonOp::Lt => a < b,
            ComparisonOp::Le => a <= b,
            ComparisonOp::Eq => a == b,
            ComparisonOp::Ne => a != b,
            ComparisonOp::Ge => a >= b,
            ComparisonOp::Gt => a > b,
        };
        return Some(result);
    }
    if std::mem::discriminant(lhs) != std::mem::discriminant(rhs) {
        return None;
    }
    match op {
        ComparisonOp::Eq => Some(lhs == rhs),
        ComparisonOp::Ne => Some(lhs != rhs),
        _ => None
    }
}

fn fold_int(op: OperationOp, a: i32, b: i32) -> Result<i32, FoldError> {
    match op {
        OperationOp::Add => Ok(a.wrapping_add(b)),
        OperationOp::Sub => Ok(a.wrapping_sub(b)),
        OperationOp::Mul => Ok(a.wrapping_mul(b)),
        OperationOp::Div => {
            if b == 0 {
                return Err(FoldError::DivisionByZero);
            }
            let quot = a.wrapping_div(b);
            if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
                Ok(quot.wrapping_sub(1))
            } else {
                Ok(quot)
            }
        },
        OperationOp::Rem => {
            if b == 0 {
                return Err(FoldError::DivisionByZero);
            }
            let rem = a.wrapping_rem(b);
            if rem != 0 && ((rem < 0) != (b < 0)) {
                Ok(rem.wrapping_add(b))
            } else {
                Ok(rem)
            }
        }
    }
}

fn fold_float(op: OperationOp, a: f64, b: f64) -> f64 {
    match op {
        OperationOp::Add => a + b,
        OperationOp::Sub => a - b,
        OperationOp::Mul => a * b,
        OperationOp::Div => a / b,
        OperationOp::Rem => a.rem_euclid(b),
    }
}

fn as_f64(c: &Constant) -> f64 {
    match c {
        Constant::Integer(v) => *v as f64,
        Constant::Float(v) => *v,
        _ => f64::NAN
    }
}
