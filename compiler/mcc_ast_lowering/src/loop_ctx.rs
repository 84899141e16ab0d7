// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_mir::BlockId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopContext {
    /// `continue` jumps here
    pub head_block: BlockId,

    /// `break` jumps here
    pub exit_block: BlockId
}

/// Where control goes for the non-local statements of the code being
/// lowered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCtx {
    pub loop_ctx: Option<LoopContext>,

    /// Receives throws and failed calls of the enclosing `try`.
    pub landing_pad: Option<BlockId>,
}

impl FrameCtx {
    pub fn enter_loop(self, head_block: BlockId, exit_block: BlockId) -> Self {
        Self { loop_ctx: Some(LoopContext { head_block, exit_block }), ..self }
    }

    pub fn enter_try(self, landing_pad: BlockId) -> Self {
        Self { landing_pad: Some(landing_pad), ..self }
    }
}
