// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_mir::RuntimeLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Namespace every generated procedure lives in
    pub namespace: String,

    /// Run the block optimizer before generating commands
    pub optimize: bool,
    pub layout: RuntimeLayout,
}

pub struct CompilerOptionsBuilder {
    namespace: String,
    optimize: Option<bool>,
    layout: Option<RuntimeLayout>,
}

impl CompilerOptionsBuilder {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            optimize: None,
            layout: None
        }
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = Some(optimize);
        self
    }

    pub fn layout(mut self, layout: RuntimeLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn build(self) -> CompilerOptions {
        CompilerOptions {
            namespace: self.namespace,
            optimize: self.optimize.unwrap_or(true),
            layout: self.layout.unwrap_or_default(),
        }
    }
}
