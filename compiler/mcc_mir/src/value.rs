// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::{Constant, ResourceLocation};
use mcc_span::Span;
use mcc_types::Ty;
use mcc_utils::bug;

use crate::function::FunctionId;
use crate::instruction::IRInstruction;
use crate::result::ReferenceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Value,
    ImmutableReference,
    MutableReference,
}

impl FieldKind {
    pub fn is_reference(self) -> bool {
        !matches!(self, FieldKind::Value)
    }

    pub fn is_mutable(self) -> bool {
        matches!(self, FieldKind::MutableReference)
    }
}

#[derive(Debug, Clone)]
pub enum ValueKind {
    Constant(Constant),

    /// Declared parameter. `quoted` parameters are strings at the macro
    /// boundary.
    Argument {
        name: String,
        index: usize,
        quoted: bool,
    },

    /// Module-level variable.
    Global {
        name: String,
    },

    /// Branch-result slot, written by the jumps that carry a value.
    Slot {
        index: usize,
    },

    /// The value thrown into the landing pad being executed.
    CaughtException,

    External {
        kind: ReferenceKind,
        target: String,
        path: String,
    },

    Function {
        function: FunctionId,
        location: ResourceLocation,
    },

    Instruction(IRInstruction),
}

#[derive(Debug, Clone)]
pub struct Value {
    pub span:       Span,
    pub ty:         Ty,
    pub field_kind: FieldKind,
    pub kind:       ValueKind,
    use_count:      usize,
}

impl Value {
    pub fn new(kind: ValueKind, ty: Ty, field_kind: FieldKind, span: Span) -> Self {
        Self {
            span,
            ty,
            field_kind,
            kind,
            use_count: 0
        }
    }

    pub fn use_count(&self) -> usize {
        self.use_count
    }

    pub fn add_use(&mut self) {
        self.use_count += 1;
    }

    pub fn drop_use(&mut self) {
        if self.use_count == 0 {
            bug!("dropping a use of a value with no uses");
        }
        self.use_count -= 1;
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ValueKind::Constant(c) => Some(c),
            _ => None
        }
    }

    pub fn as_instruction(&self) -> Option<&IRInstruction> {
        match &self.kind {
            ValueKind::Instruction(inst) => Some(inst),
            _ => None
        }
    }

    pub fn as_instruction_mut(&mut self) -> Option<&mut IRInstruction> {
        match &mut self.kind {
            ValueKind::Instruction(inst) => Some(inst),
            _ => None
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ValueKind::Constant(_))
    }

    /// True if the value's result can be written into a macro argument
    /// object literally, without materializing it first.
    pub fn is_inline_operand(&self) -> bool {
        match &self.kind {
            ValueKind::Constant(_) | ValueKind::Function { .. } => true,
            ValueKind::Argument { .. } => !self.field_kind.is_reference(),
            _ => false
        }
    }
}
