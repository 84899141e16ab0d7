// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

/// Namespace used when a location is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceLocationError {
    #[error("empty resource location")]
    Empty,

    #[error("invalid character '{ch}' in '{text}'")]
    InvalidChar { ch: char, text: String },
}

/// A namespace-qualified path such as `mcc:math/add`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
}

impl ResourceLocation {
    pub fn new(namespace: &str, path: &str) -> Result<Self, ResourceLocationError> {
        if namespace.is_empty() || path.is_empty() {
            return Err(ResourceLocationError::Empty);
        }
        validate(namespace, |c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))?;
        validate(path, |c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))?;
        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string()
        })
    }

    /// The location of the `index`-th sub-procedure: `ns:path/index`.
    pub fn child(&self, index: usize) -> Self {
        Self {
            namespace: self.namespace.clone(),
            path: format!("{}/{index}", self.path)
        }
    }

    /// Sibling path in the same namespace.
    pub fn with_path(&self, path: &str) -> Result<Self, ResourceLocationError> {
        Self::new(&self.namespace, path)
    }

    /// For a sub-procedure location `ns:path/index`, the location `ns:path`
    /// whose blocks it would name.
    pub fn parent_procedure(&self) -> Option<Self> {
        let (parent, index) = self.path.rsplit_once('/')?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.with_path(parent).ok()
    }
}

fn validate(text: &str, allowed: impl Fn(char) -> bool) -> Result<(), ResourceLocationError> {
    match text.chars().find(|c| !allowed(*c)) {
        Some(ch) => Err(ResourceLocationError::InvalidChar { ch, text: text.to_string() }),
        None => Ok(())
    }
}

impl FromStr for ResourceLocation {
    type Err = ResourceLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ns, path)) => Self::new(ns, path),
            None => Self::new(DEFAULT_NAMESPACE, s)
        }
    }
}

impl Display for ResourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
