// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use lazy_static::lazy_static;

/// A fake player on the scratch objective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRegister {
    pub name: String,
}

impl Display for ScoreRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// Scratch registers
lazy_static! {
    /// Accumulator of operations and left side of comparisons.
    pub static ref REG_ACC: ScoreRegister = ScoreRegister {
        name: String::from("%r0")
    };

    pub static ref REG_AUX: ScoreRegister = ScoreRegister {
        name: String::from("%r1")
    };

    pub static ref REG_COND: ScoreRegister = ScoreRegister {
        name: String::from("%cond")
    };

    /// Return status of the last throwing call.
    pub static ref REG_STATUS: ScoreRegister = ScoreRegister {
        name: String::from("%status")
    };
}
