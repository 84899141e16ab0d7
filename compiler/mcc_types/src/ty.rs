// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// Interned type handle. Two handles from the same [`crate::TyCtx`] are equal
/// iff they denote the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ty(pub(crate) u32);

impl Ty {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TyKind {
    Void,
    Boolean,
    Integer,
    Float,
    String,
    Resource,
    Range,
    Selector,

    // Composite types
    Array {
        elem: Ty,
    },

    Object {
        fields: Vec<(String, Ty)>,
    },

    Function {
        params: Vec<Ty>,
        ret: Ty,
    },
}

impl TyKind {
    pub fn is_void(&self) -> bool {
        *self == Self::Void
    }

    /// Types whose runtime arithmetic goes through scoreboards.
    pub fn is_scoreboard_numeric(&self) -> bool {
        matches!(self, TyKind::Integer | TyKind::Boolean)
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, TyKind::Array { .. } | TyKind::Object { .. })
    }
}
