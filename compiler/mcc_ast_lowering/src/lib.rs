// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod ast_to_mir;
mod expr;
pub mod loop_ctx;

pub use ast_to_mir::AstToMirLowerer;
