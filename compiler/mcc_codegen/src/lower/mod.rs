// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Per-instruction lowering, split by instruction family. Every function
//! here appends to the block's command list.

mod arith;
mod call;
mod control;
mod data;
mod intrinsic;
