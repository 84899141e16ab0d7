// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    AllPlayers,
    AllEntities,
    NearestPlayer,
    RandomPlayer,
    Executor,
}

impl SelectorKind {
    pub fn variable(self) -> char {
        match self {
            SelectorKind::AllPlayers    => 'a',
            SelectorKind::AllEntities   => 'e',
            SelectorKind::NearestPlayer => 'p',
            SelectorKind::RandomPlayer  => 'r',
            SelectorKind::Executor      => 's',
        }
    }
}

/// A target selector with its `[key=value]` attributes, kept in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSelector {
    pub kind: SelectorKind,
    pub attributes: Vec<(String, String)>,
}

impl TargetSelector {
    pub fn new(kind: SelectorKind) -> Self {
        Self { kind, attributes: vec![] }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.attributes.push((key.to_string(), value.to_string()));
        self
    }
}

impl Display for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.kind.variable())?;
        if !self.attributes.is_empty() {
            let attrs = self.attributes.iter().map(|(k, v)| format!("{k}={v}")).join(",");
            write!(f, "[{attrs}]")?;
        }
        Ok(())
    }
}
