// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod arena;
pub mod layout;
pub mod value;
pub mod result;
pub mod instruction;
pub mod block;
pub mod function;
pub mod module;
pub mod scope;
pub mod intrinsics;
pub mod builder;
pub mod analyzer;
pub mod opt;

use mcc_errors::CompileError;

/// Result of every graph-mutating builder operation.
pub type BuildResult<T> = Result<T, CompileError>;

/// Result of turning a value into a [`result::IRResult`].
pub type LowerResult<T> = Result<T, CompileError>;

pub use arena::{Arena, BlockId, ValueId};
pub use builder::IRBuilder;
pub use function::{Function, FunctionId, Parameter};
pub use layout::{RuntimeLayout, RuntimeLayoutBuilder};
pub use module::Module;
pub use value::{FieldKind, Value, ValueKind};
