// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod span;

pub use span::{HasSpan, SourcePos, Span};
