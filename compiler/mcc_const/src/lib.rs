// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod constant;
pub mod fold;
pub mod ops;
pub mod resource;
pub mod selector;

pub use constant::Constant;
pub use fold::FoldError;
pub use ops::{ComparisonOp, OperationOp};
pub use resource::{ResourceLocation, ResourceLocationError};
pub use selector::{SelectorKind, TargetSelector};
