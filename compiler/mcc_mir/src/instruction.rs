// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_const::{ComparisonOp, OperationOp, ResourceLocation};

use crate::arena::{BlockId, ValueId};
use crate::function::{FunctionId, Parameter};
use crate::intrinsics::IntrinsicKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationKind {
    Value,
    Array,
    Object,
}

impl AllocationKind {
    /// SNBT a fresh slot of this kind is initialized with.
    pub fn initial_snbt(self) -> &'static str {
        match self {
            AllocationKind::Value => "0",
            AllocationKind::Array => "[]",
            AllocationKind::Object => "{}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutateOp {
    Append,
    Prepend,
    Insert(i32),
    Merge,
}

/// Value carried along a jump into a branch-result slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhiWrite {
    pub value: ValueId,
    pub slot: ValueId,
}

/// Snapshot of the callee's signature taken when the call is built.
#[derive(Debug, Clone)]
pub struct CallTarget {
    pub function:       FunctionId,
    pub location:       ResourceLocation,
    pub params:         Vec<Parameter>,
    pub throws:         bool,
    pub returns_value:  bool,
}

#[derive(Debug, Clone)]
pub enum IRInstruction {
    Allocation {
        slot: usize,
        kind: AllocationKind,
    },

    /// `operands[0] op operands[1] op ...`, reduced left to right.
    Operation {
        op: OperationOp,
        operands: Vec<ValueId>,
    },

    Comparison {
        op: ComparisonOp,
        lhs: ValueId,
        rhs: ValueId,
    },

    Branch {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },

    Switch {
        cond: ValueId,
        cases: Vec<(ValueId, BlockId)>,
        default: BlockId,
    },

    DirectJump {
        target: BlockId,
        phi: Option<PhiWrite>,
    },

    Return {
        value: Option<ValueId>,
    },

    Throw {
        value: ValueId,
        landing_pad: Option<BlockId>,
    },

    Call {
        callee: CallTarget,
        args: Vec<ValueId>,
        landing_pad: Option<BlockId>,

        /// All arguments fit in a literal macro object.
        inline_args: bool,
    },

    Store {
        dst: ValueId,
        src: ValueId,
    },

    Member {
        base: ValueId,
        name: String,
    },

    Index {
        base: ValueId,
        index: ValueId,
    },

    Mutate {
        target: ValueId,
        op: MutateOp,
        value: ValueId,
    },

    /// Moves `target[index]` out of the list into a temporary.
    Extract {
        target: ValueId,
        index: ValueId,
    },

    Remove {
        target: ValueId,
    },

    Intrinsic {
        kind: IntrinsicKind,
        args: Vec<ValueId>,
    },

    /// Raw command text.
    Command {
        text: String,
        side_effects: bool,
    },
}

impl IRInstruction {
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            IRInstruction::Branch { .. }
                | IRInstruction::Switch { .. }
                | IRInstruction::DirectJump { .. }
                | IRInstruction::Return { .. }
                | IRInstruction::Throw { .. }
        )
    }

    /// Whether lowering writes into the current frame, given how many
    /// consumers the instruction's value has.
    pub fn requires_stack(&self, use_count: usize) -> bool {
        match self {
            IRInstruction::Allocation { .. } | IRInstruction::Extract { .. } => true,
            IRInstruction::Operation { .. } | IRInstruction::Comparison { .. } => use_count > 0,
            IRInstruction::Call { callee, inline_args, .. } => {
                callee.throws || !inline_args || (callee.returns_value && use_count > 0)
            },
            _ => false
        }
    }

    /// Emits nothing when its value is never consumed.
    pub fn is_elidable(&self) -> bool {
        match self {
            IRInstruction::Operation { .. }
            | IRInstruction::Comparison { .. }
            | IRInstruction::Member { .. }
            | IRInstruction::Index { .. } => true,
            IRInstruction::Command { side_effects, .. } => !side_effects,
            _ => false
        }
    }

    /// Every value this instruction holds a use of, in operand order.
    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            IRInstruction::Allocation { .. } | IRInstruction::Command { .. } => vec![],
            IRInstruction::Operation { operands, .. } => operands.clone(),
            IRInstruction::Comparison { lhs, rhs, .. } => vec![*lhs, *rhs],
            IRInstruction::Branch { cond, .. } => vec![*cond],
            IRInstruction::Switch { cond, cases, .. } => {
                std::iter::once(*cond).chain(cases.iter().map(|(value, _)| *value)).collect()
            },
            IRInstruction::DirectJump { phi, .. } => match phi {
                Some(phi) => vec![phi.value, phi.slot],
                None => vec![]
            },
            IRInstruction::Return { value } => value.iter().copied().collect(),
            IRInstruction::Throw { value, .. } => vec![*value],
            IRInstruction::Call { args, .. } => args.clone(),
            IRInstruction::Store { dst, src } => vec![*dst, *src],
            IRInstruction::Member { base, .. } => vec![*base],
            IRInstruction::Index { base, index } => vec![*base, *index],
            IRInstruction::Mutate { target, value, .. } => vec![*target, *value],
            IRInstruction::Extract { target, index } => vec![*target, *index],
            IRInstruction::Remove { target } => vec![*target],
            IRInstruction::Intrinsic { args, .. } => args.clone(),
        }
    }

    /// Blocks control may reach from here, including landing pads.
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            IRInstruction::Branch { then_block, else_block, .. } => vec![*then_block, *else_block],
            IRInstruction::Switch { cases, default, .. } => {
                cases.iter().map(|(_, block)| *block).chain(std::iter::once(*default)).collect()
            },
            IRInstruction::DirectJump { target, .. } => vec![*target],
            IRInstruction::Throw { landing_pad, .. } | IRInstruction::Call { landing_pad, .. } => {
                landing_pad.iter().copied().collect()
            },
            _ => vec![]
        }
    }

    pub fn landing_pad(&self) -> Option<BlockId> {
        match self {
            IRInstruction::Throw { landing_pad, .. } | IRInstruction::Call { landing_pad, .. } => *landing_pad,
            _ => None
        }
    }
}
