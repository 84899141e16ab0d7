// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use log::trace;

use crate::arena::BlockId;
use crate::function::Function;

/// Erases every non-entry block without predecessors. Erasing a block can
/// orphan its successors, so this repeats until nothing changes.
pub fn eliminate_dead_blocks(func: &mut Function) -> usize {
    let mut erased = 0;
    loop {
        let entry = func.entry();
        let dead = func.block_order
            .iter()
            .copied()
            .filter(|b| *b != entry && func.block(*b).is_some_and(|block| block.predecessors.is_empty()))
            .collect::<Vec<BlockId>>();
        if dead.is_empty() {
            return erased;
        }
        for block in dead {
            if let Some(location) = func.block_location(block) {
                trace!("erasing unreachable block {location}");
            }
            func.erase_block(block);
            erased += 1;
        }
    }
}
