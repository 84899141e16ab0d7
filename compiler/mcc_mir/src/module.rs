// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use mcc_const::{Constant, ResourceLocation};
use mcc_span::Span;
use mcc_types::Ty;

use crate::arena::BlockId;
use crate::function::{Function, FunctionId};

#[derive(Debug, Clone)]
pub struct Global {
    pub name: String,
    pub ty: Ty,
    pub initializer: Option<Constant>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Module {
    pub namespace: String,
    pub functions: Vec<Function>,
    pub globals: IndexMap<String, Global>,
}

impl Module {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            functions: vec![],
            globals: IndexMap::new()
        }
    }

    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get(id.0)
    }

    pub fn function_mut(&mut self, id: FunctionId) -> Option<&mut Function> {
        self.functions.get_mut(id.0)
    }

    pub fn function_by_location(&self, location: &ResourceLocation) -> Option<FunctionId> {
        self.functions.iter().find(|f| &f.location == location).map(|f| f.id)
    }

    /// Looks a function up by its path inside this module's namespace.
    pub fn function_by_name(&self, name: &str) -> Option<FunctionId> {
        self.functions
            .iter()
            .find(|f| f.location.namespace == self.namespace && f.location.path == name)
            .map(|f| f.id)
    }

    pub fn find_block(&self, location: &ResourceLocation) -> Option<(FunctionId, BlockId)> {
        self.functions
            .iter()
            .find_map(|f| f.find_block(location).map(|block| (f.id, block)))
    }

    /// Location of the bootstrap procedure.
    pub fn init_location(&self) -> Option<ResourceLocation> {
        ResourceLocation::new(&self.namespace, "__init").ok()
    }
}
