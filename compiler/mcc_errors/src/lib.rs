// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod code;
pub mod diagnostic;
pub mod error;

pub use code::ErrCode;
pub use diagnostic::{Diagnostic, Severity};
pub use error::CompileError;
