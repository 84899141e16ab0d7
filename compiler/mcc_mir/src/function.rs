// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexSet;
use mcc_const::ResourceLocation;
use mcc_errors::{CompileError, ErrCode};
use mcc_span::Span;
use mcc_types::Ty;

use crate::arena::{Arena, BlockId, ValueId};
use crate::block::Block;
use crate::instruction::IRInstruction;
use crate::layout::RuntimeLayout;
use crate::result::{IRResult, ResultKind};
use crate::value::{FieldKind, Value, ValueKind};
use crate::LowerResult;

#[derive(Default, Debug, Hash, Eq, PartialEq, Clone, Copy, PartialOrd, Ord)]
pub struct FunctionId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Ty,
    pub field_kind: FieldKind,

    /// Substituted inside quotes when forwarded as a macro argument.
    pub quoted: bool,
}

impl Parameter {
    pub fn new(name: &str, ty: Ty, field_kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            ty,
            field_kind,
            quoted: field_kind.is_reference()
        }
    }

    pub fn by_value(name: &str, ty: Ty) -> Self {
        Self::new(name, ty, FieldKind::Value)
    }

    pub fn by_reference(name: &str, ty: Ty, mutable: bool) -> Self {
        let kind = if mutable { FieldKind::MutableReference } else { FieldKind::ImmutableReference };
        Self::new(name, ty, kind)
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub id:                 FunctionId,
    pub location:           ResourceLocation,
    pub parameters:         Vec<Parameter>,
    pub result_type:        Ty,
    pub returns_value:      bool,
    pub throws:             bool,
    pub stack_slot_counter: usize,
    pub span:               Span,

    /// Function tags this function is registered under.
    pub tags:               IndexSet<ResourceLocation>,

    /// Argument values, one per parameter.
    pub arguments:          Vec<ValueId>,

    pub values:             Arena<ValueId, Value>,
    pub blocks:             Arena<BlockId, Block>,

    /// Emission order. The first block is the entry.
    pub block_order:        Vec<BlockId>,
}

impl Function {
    pub fn entry(&self) -> BlockId {
        self.block_order[0]
    }

    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id)
    }

    pub fn value_mut(&mut self, id: ValueId) -> Option<&mut Value> {
        self.values.get_mut(id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id)
    }

    pub fn instruction(&self, id: ValueId) -> Option<&IRInstruction> {
        self.values.get(id)?.as_instruction()
    }

    /// The block's terminator, if its last instruction is one.
    pub fn terminator(&self, block: BlockId) -> Option<&IRInstruction> {
        let last = self.blocks.get(block)?.last()?;
        self.instruction(last).filter(|inst| inst.is_terminator())
    }

    pub fn is_terminated(&self, block: BlockId) -> bool {
        self.terminator(block).is_some()
    }

    pub fn block_position(&self, block: BlockId) -> Option<usize> {
        self.block_order.iter().position(|b| *b == block)
    }

    /// Location the block is emitted under: the entry takes the function's
    /// own location, later blocks are numbered `name/i`.
    pub fn block_location(&self, block: BlockId) -> Option<ResourceLocation> {
        match self.block_position(block)? {
            0 => Some(self.location.clone()),
            index => Some(self.location.child(index))
        }
    }

    pub fn find_block(&self, location: &ResourceLocation) -> Option<BlockId> {
        self.block_order
            .iter()
            .copied()
            .find(|block| self.block_location(*block).as_ref() == Some(location))
    }

    /// Instructions in emission order together with their block.
    pub fn instructions(&self) -> impl Iterator<Item = (BlockId, ValueId, &IRInstruction)> {
        self.block_order.iter().flat_map(move |block| {
            self.blocks
                .get(*block)
                .into_iter()
                .flat_map(|b| b.instructions.iter())
                .filter_map(move |id| self.instruction(*id).map(|inst| (*block, *id, inst)))
        })
    }

    /// Whether this value's lowering writes into the current frame.
    pub fn requires_stack(&self, id: ValueId) -> bool {
        match self.values.get(id) {
            Some(value) => match &value.kind {
                ValueKind::Instruction(inst) => inst.requires_stack(value.use_count()),
                _ => false
            },
            None => false
        }
    }

    pub fn generate_result(&self, id: ValueId, layout: &RuntimeLayout, stringify: bool) -> LowerResult<IRResult> {
        let value = self.values.get(id).ok_or_else(|| {
            CompileError::construction(ErrCode::CON1001, self.span, "operand refers to an erased value")
        })?;

        let result = match &value.kind {
            ValueKind::Constant(c) => {
                let text = if stringify { c.to_json_text() } else { c.to_snbt() };
                return Ok(IRResult::literal(text));
            },
            ValueKind::Function { location, .. } => {
                let text = format!("\"{location}\"");
                return Ok(IRResult::literal(text));
            },
            ValueKind::Argument { name, quoted, .. } => {
                if value.field_kind.is_reference() {
                    IRResult::storage(&layout.storage, &format!("$({name})")).with_argument(true)
                } else {
                    IRResult::macro_argument(name, *quoted)
                }
            },
            ValueKind::Global { name } => IRResult::storage(&layout.storage, &layout.global_path(name)),
            ValueKind::Slot { index } => IRResult::storage(&layout.storage, &layout.slot_path(*index)),
            ValueKind::CaughtException => IRResult::storage(&layout.storage, &layout.result),
            ValueKind::External { kind, target, path } => IRResult::reference(*kind, target, path),
            ValueKind::Instruction(inst) => self.instruction_result(id, value, inst, layout)?,
        };

        Ok(if stringify { result.stringified() } else { result })
    }

    fn instruction_result(&self, id: ValueId, value: &Value, inst: &IRInstruction, layout: &RuntimeLayout) -> LowerResult<IRResult> {
        use crate::arena::ArenaKey;

        match inst {
            IRInstruction::Allocation { slot, .. } => Ok(IRResult::storage(&layout.storage, &layout.slot_path(*slot))),
            IRInstruction::Operation { .. }
            | IRInstruction::Comparison { .. }
            | IRInstruction::Extract { .. } => Ok(IRResult::storage(&layout.storage, &layout.temp_path(id.index()))),
            IRInstruction::Call { callee, .. } if callee.returns_value => {
                Ok(IRResult::storage(&layout.storage, &layout.temp_path(id.index())))
            },
            IRInstruction::Member { base, name } => {
                let base_result = self.generate_result(*base, layout, false)?;
                base_result.extend_path(&member_suffix(name)).ok_or_else(|| {
                    CompileError::lowering(ErrCode::LOW2000, value.span, format!("cannot access member '{name}' of a non-reference"))
                })
            },
            IRInstruction::Index { base, index } => {
                let base_result = self.generate_result(*base, layout, false)?;
                let index_result = self.generate_result(*index, layout, false)?;
                let suffix = match &index_result.kind {
                    ResultKind::Literal(text) => format!("[{text}]"),
                    ResultKind::MacroArgument { name, quoted: false } => format!("[$({name})]"),
                    _ => {
                        return Err(CompileError::lowering(
                            ErrCode::LOW2000,
                            value.span,
                            "list index must be a literal or a macro argument"
                        ))
                    }
                };
                let with_argument = base_result.with_argument || index_result.with_argument;
                base_result
                    .extend_path(&suffix)
                    .map(|r| r.with_argument(with_argument))
                    .ok_or_else(|| CompileError::lowering(ErrCode::LOW2000, value.span, "cannot index a non-reference"))
            },
            _ => Err(CompileError::lowering(ErrCode::LOW2000, value.span, "instruction produces no value"))
        }
    }
}

/// Edge bookkeeping. Only the builder and the optimizer call these.
impl Function {
    pub(crate) fn link(&mut self, from: BlockId, to: BlockId) {
        if let Some(block) = self.blocks.get_mut(from) {
            block.successors.insert(to);
        }
        if let Some(block) = self.blocks.get_mut(to) {
            block.predecessors.insert(from);
        }
    }

    /// Releases every operand of `id` and removes the value.
    pub(crate) fn erase_value(&mut self, id: ValueId) {
        let operands = self.instruction(id).map(IRInstruction::operands).unwrap_or_default();
        for operand in operands {
            if let Some(value) = self.values.get_mut(operand) {
                value.drop_use();
            }
        }
        self.values.remove(id);
    }

    /// Removes a block together with its instructions and every edge that
    /// mentions it.
    pub(crate) fn erase_block(&mut self, id: BlockId) {
        let Some(block) = self.blocks.remove(id) else {
            return;
        };

        // release all uses before removing anything, so uses between
        // instructions of the same block are balanced
        for inst in &block.instructions {
            let operands = self.instruction(*inst).map(IRInstruction::operands).unwrap_or_default();
            for operand in operands {
                if let Some(value) = self.values.get_mut(operand) {
                    value.drop_use();
                }
            }
        }
        for inst in &block.instructions {
            self.values.remove(*inst);
        }

        for succ in &block.successors {
            if let Some(s) = self.blocks.get_mut(*succ) {
                s.predecessors.shift_remove(&id);
            }
        }
        for pred in &block.predecessors {
            if let Some(p) = self.blocks.get_mut(*pred) {
                p.successors.shift_remove(&id);
            }
        }
        self.block_order.retain(|b| *b != id);
    }
}

fn member_suffix(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!(".{name}")
    } else {
        format!(".\"{name}\"")
    }
}
