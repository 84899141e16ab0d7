// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexSet;

use crate::arena::{BlockId, ValueId};
use crate::function::FunctionId;

/// A straight-line run of instructions ending in one terminator.
#[derive(Debug, Clone)]
pub struct Block {
    pub parent: FunctionId,
    pub predecessors: IndexSet<BlockId>,
    pub successors: IndexSet<BlockId>,
    pub instructions: Vec<ValueId>,
}

impl Block {
    pub fn new(parent: FunctionId) -> Self {
        Self {
            parent,
            predecessors: IndexSet::new(),
            successors: IndexSet::new(),
            instructions: vec![]
        }
    }

    pub fn last(&self) -> Option<ValueId> {
        self.instructions.last().copied()
    }
}
