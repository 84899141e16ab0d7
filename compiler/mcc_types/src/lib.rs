// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod ctx;
pub mod ty;

pub use ctx::TyCtx;
pub use ty::{Ty, TyKind};
