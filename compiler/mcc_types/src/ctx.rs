// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;

use indexmap::IndexMap;
use indexmap::IndexSet;
use mcc_const::Constant;

use crate::ty::{Ty, TyKind};

/// Type interner.
#[derive(Debug)]
pub struct TyCtx {
    types: RefCell<IndexSet<TyKind>>,
}

impl Default for TyCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl TyCtx {
    pub fn new() -> Self {
        let tcx = Self {
            types: RefCell::new(IndexSet::new())
        };
        // primitives get stable handles
        for kind in [TyKind::Void, TyKind::Boolean, TyKind::Integer, TyKind::Float, TyKind::String] {
            tcx.mk_ty(kind);
        }
        tcx
    }

    pub fn mk_ty(&self, kind: TyKind) -> Ty {
        let mut types = self.types.borrow_mut();
        let (index, _) = types.insert_full(kind);
        Ty(index as u32)
    }

    pub fn kind(&self, ty: Ty) -> TyKind {
        self.types
            .borrow()
            .get_index(ty.index())
            .cloned()
            .unwrap_or_else(|| panic!("type handle {ty:?} was not created by this context"))
    }

    pub fn void(&self) -> Ty { Ty(0) }
    pub fn boolean(&self) -> Ty { Ty(1) }
    pub fn integer(&self) -> Ty { Ty(2) }
    pub fn float(&self) -> Ty { Ty(3) }
    pub fn string(&self) -> Ty { Ty(4) }

    pub fn array_of(&self, elem: Ty) -> Ty {
        self.mk_ty(TyKind::Array { elem })
    }

    /// Type of a constant payload.
    pub fn type_of(&self, constant: &Constant) -> Ty {
        match constant {
            Constant::Boolean(_) => self.boolean(),
            Constant::Integer(_) => self.integer(),
            Constant::Float(_) => self.float(),
            Constant::String(_) => self.string(),
            Constant::Resource(_) => self.mk_ty(TyKind::Resource),
            Constant::Range(..) => self.mk_ty(TyKind::Range),
            Constant::Selector(_) => self.mk_ty(TyKind::Selector),
            Constant::Array(items) => {
                let elem = items.first().map(|c| self.type_of(c)).unwrap_or_else(|| self.void());
                self.array_of(elem)
            },
            Constant::Object(fields) => {
                let fields = fields.iter().map(|(k, v)| (k.clone(), self.type_of(v))).collect();
                self.mk_ty(TyKind::Object { fields })
            }
        }
    }

    /// Zero value a freshly allocated slot of this type holds, if any.
    pub fn default_value(&self, ty: Ty) -> Option<Constant> {
        match self.kind(ty) {
            TyKind::Boolean => Some(Constant::Boolean(false)),
            TyKind::Integer => Some(Constant::Integer(0)),
            TyKind::Float => Some(Constant::Float(0.0)),
            TyKind::String => Some(Constant::String(String::new())),
            TyKind::Array { .. } => Some(Constant::Array(vec![])),
            TyKind::Object { fields } => {
                let mut values = IndexMap::new();
                for (name, field_ty) in fields {
                    values.insert(name, self.default_value(field_ty)?);
                }
                Some(Constant::Object(values))
            },
            TyKind::Void
            | TyKind::Resource
            | TyKind::Range
            | TyKind::Selector
            | TyKind::Function { .. } => None,
        }
    }

    /// Type of `ty.name`, if `ty` is an object with that field.
    pub fn field_type(&self, ty: Ty, name: &str) -> Option<Ty> {
        match self.kind(ty) {
            TyKind::Object { fields } => fields.into_iter().find(|(n, _)| n == name).map(|(_, t)| t),
            _ => None
        }
    }

    pub fn element_type(&self, ty: Ty) -> Option<Ty> {
        match self.kind(ty) {
            TyKind::Array { elem } => Some(elem),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_gives_identity() {
        let tcx = TyCtx::new();
        let a = tcx.array_of(tcx.integer());
        let b = tcx.mk_ty(TyKind::Array { elem: tcx.integer() });
        assert_eq!(a, b);
        assert_ne!(a, tcx.array_of(tcx.string()));
        assert_eq!(tcx.mk_ty(TyKind::Integer), tcx.integer());
    }

    #[test]
    fn test_default_values() {
        let tcx = TyCtx::new();
        assert_eq!(tcx.default_value(tcx.integer()), Some(Constant::Integer(0)));
        assert_eq!(tcx.default_value(tcx.void()), None);

        let point = tcx.mk_ty(TyKind::Object {
            fields: vec![(String::from("x"), tcx.integer()), (String::from("tag"), tcx.string())]
        });
        assert_eq!(tcx.default_value(point).map(|c| c.to_snbt()), Some(String::from(r#"{x:0,tag:""}"#)));
        assert_eq!(tcx.field_type(point, "tag"), Some(tcx.string()));
    }

    #[test]
    fn test_constant_types() {
        let tcx = TyCtx::new();
        assert_eq!(tcx.type_of(&Constant::Integer(3)), tcx.integer());
        let arr = Constant::Array(vec![Constant::Boolean(true)]);
        assert_eq!(tcx.element_type(tcx.type_of(&arr)), Some(tcx.boolean()));
    }
}
