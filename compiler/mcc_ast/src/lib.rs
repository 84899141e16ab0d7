// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Statement and expression trees handed to the lowering. There is no
//! parser; trees are assembled in code.

mod decl;
mod expr;
mod operation;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use operation::*;
pub use stmt::*;
