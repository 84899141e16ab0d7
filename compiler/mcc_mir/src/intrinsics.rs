// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use lazy_static::lazy_static;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    /// `print(values...)`: tellraw to every player.
    Print,

    /// `swap(a, b)`: exchange two data locations.
    Swap,

    /// `data(target, value)`: raw data write, ignores mutability.
    Data,

    /// `scoreboard(player, objective, value)`: store a value into a score.
    Scoreboard,

    /// `run(command)`: emit a raw command.
    Run,
}

#[derive(Debug, Clone, Copy)]
pub struct IntrinsicSignature {
    pub kind: IntrinsicKind,
    pub min_args: usize,
    pub max_args: Option<usize>,
}

impl IntrinsicSignature {
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }
}

lazy_static! {
    pub static ref INTRINSICS: IndexMap<&'static str, IntrinsicSignature> = {
        let mut table = IndexMap::new();
        table.insert("print", IntrinsicSignature { kind: IntrinsicKind::Print, min_args: 1, max_args: None });
        table.insert("swap", IntrinsicSignature { kind: IntrinsicKind::Swap, min_args: 2, max_args: Some(2) });
        table.insert("data", IntrinsicSignature { kind: IntrinsicKind::Data, min_args: 2, max_args: Some(2) });
        table.insert("scoreboard", IntrinsicSignature { kind: IntrinsicKind::Scoreboard, min_args: 3, max_args: Some(3) });
        table.insert("run", IntrinsicSignature { kind: IntrinsicKind::Run, min_args: 1, max_args: Some(1) });
        table
    };
}

pub fn lookup_intrinsic(name: &str) -> Option<&'static IntrinsicSignature> {
    INTRINSICS.get(name)
}
