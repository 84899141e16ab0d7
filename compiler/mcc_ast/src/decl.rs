// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::Constant;
use mcc_span::Span;
use mcc_types::Ty;

use crate::Stmt;

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: Ty,

    /// Passed as a storage path instead of a copied value.
    pub by_ref: bool,
    pub mutable: bool,
}

impl ParamDecl {
    pub fn value(name: &str, ty: Ty) -> Self {
        Self { name: name.to_string(), ty, by_ref: false, mutable: false }
    }

    pub fn reference(name: &str, ty: Ty, mutable: bool) -> Self {
        Self { name: name.to_string(), ty, by_ref: true, mutable }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncDeclStmt {
    /// Function's name, also its path inside the namespace
    pub name: String,
    pub params: Vec<ParamDecl>,

    /// Function's return type
    pub ty: Ty,
    pub throws: bool,

    /// Function tags such as `minecraft:tick`
    pub tags: Vec<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl FuncDeclStmt {
    pub fn new(name: &str, params: Vec<ParamDecl>, ty: Ty, body: Vec<Stmt>) -> Self {
        Self {
            name: name.to_string(),
            params,
            ty,
            throws: false,
            tags: vec![],
            body,
            span: Span::default()
        }
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn tagged(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlobalDeclStmt {
    pub name: String,
    pub ty: Ty,
    pub value: Option<Constant>,
    pub span: Span,
}

impl GlobalDeclStmt {
    pub fn new(name: &str, ty: Ty, value: Option<Constant>) -> Self {
        Self { name: name.to_string(), ty, value, span: Span::default() }
    }
}

/// A whole compilation unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub globals: Vec<GlobalDeclStmt>,
    pub functions: Vec<FuncDeclStmt>,
}
