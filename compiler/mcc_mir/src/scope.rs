// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use mcc_types::Ty;

use crate::arena::ValueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub value: ValueId,
    pub ty: Ty,
    pub mutable: bool,
}

/// Lexical scopes of one function. The bottom scope holds the parameters
/// and is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<IndexMap<String, Variable>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self { scopes: vec![IndexMap::new()] }
    }
}

impl ScopeStack {
    pub fn push(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    /// Returns `false` if only the bottom scope is left.
    pub fn pop(&mut self) -> bool {
        if self.scopes.len() == 1 {
            return false;
        }
        self.scopes.pop();
        true
    }

    /// Returns `false` if `name` already exists in the innermost scope.
    pub fn declare(&mut self, name: &str, var: Variable) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.contains_key(name) {
            return false;
        }
        scope.insert(name.to_string(), var);
        true
    }

    pub fn declared_here(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains_key(name))
    }

    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
