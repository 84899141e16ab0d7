// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_span::Span;
use thiserror::Error;

use crate::code::ErrCode;

/// Every error the middle/back end can raise. All of them are fatal: the
/// pipeline stops at the first one and writes nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// A builder precondition was violated.
    #[error("construction error [{code:?}] at {span}: {message}")]
    Construction {
        code: ErrCode,
        span: Span,
        message: String,
    },

    /// An instruction received an operand it cannot lower.
    #[error("lowering error [{code:?}] at {span}: {message}")]
    Lowering {
        code: ErrCode,
        span: Span,
        message: String,
    },

    /// A variable, global, block or function lookup failed.
    #[error("unresolved reference [{code:?}] at {span}: '{name}'")]
    UnresolvedReference {
        code: ErrCode,
        span: Span,
        name: String,
    },
}

impl CompileError {
    pub fn construction(code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self::Construction { code, span, message: message.into() }
    }

    pub fn lowering(code: ErrCode, span: Span, message: impl Into<String>) -> Self {
        Self::Lowering { code, span, message: message.into() }
    }

    pub fn unresolved(code: ErrCode, span: Span, name: impl Into<String>) -> Self {
        Self::UnresolvedReference { code, span, name: name.into() }
    }

    pub fn code(&self) -> ErrCode {
        match self {
            Self::Construction { code, .. }
            | Self::Lowering { code, .. }
            | Self::UnresolvedReference { code, .. } => *code,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Construction { span, .. }
            | Self::Lowering { span, .. }
            | Self::UnresolvedReference { span, .. } => *span,
        }
    }
}
