// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;
use indexmap::IndexSet;
use log::{debug, trace};

use mcc_const::fold::{fold_comparison, fold_operands, FoldError};
use mcc_const::{ComparisonOp, Constant, OperationOp, ResourceLocation};
use mcc_errors::{CompileError, ErrCode};
use mcc_span::Span;
use mcc_types::{Ty, TyCtx, TyKind};

use crate::arena::{Arena, BlockId, ValueId};
use crate::block::Block;
use crate::function::{Function, FunctionId, Parameter};
use crate::instruction::*;
use crate::intrinsics::{lookup_intrinsic, IntrinsicKind};
use crate::module::{Global, Module};
use crate::result::ReferenceKind;
use crate::scope::{ScopeStack, Variable};
use crate::value::{FieldKind, Value, ValueKind};
use crate::BuildResult;

/// The only component that mutates the control-flow graph.
///
/// Instructions are appended to the current insertion point. Terminators
/// and calls with a landing pad are the only operations that create edges.
/// Constant operands are folded here, so later stages never see e.g. an
/// operation over two literals.
pub struct IRBuilder<'tcx> {
    tcx: &'tcx TyCtx,
    module: Module,

    current_function: Option<FunctionId>,
    current_block: Option<BlockId>,

    scopes: IndexMap<FunctionId, ScopeStack>,
}

impl<'tcx> IRBuilder<'tcx> {
    pub fn new(tcx: &'tcx TyCtx, namespace: &str) -> Self {
        Self {
            tcx,
            module: Module::new(namespace),
            current_function: None,
            current_block: None,
            scopes: IndexMap::new()
        }
    }

    pub fn tcx(&self) -> &'tcx TyCtx {
        self.tcx
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn finish(self) -> Module {
        self.module
    }

    pub fn current_function(&self) -> Option<FunctionId> {
        self.current_function
    }

    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    pub fn function(&self, id: FunctionId) -> Option<&Function> {
        self.module.function(id)
    }

    /// The init procedure and block procedures `<fn>/<n>` share the function
    /// namespace, in either declaration order.
    fn is_reserved_location(&self, location: &ResourceLocation) -> bool {
        self.module.init_location().as_ref() == Some(location)
            || location
                .parent_procedure()
                .is_some_and(|parent| self.module.function_by_location(&parent).is_some())
            || self
                .module
                .functions
                .iter()
                .any(|f| f.location.parent_procedure().as_ref() == Some(location))
    }

    pub fn create_function(
        &mut self,
        name: &str,
        params: Vec<Parameter>,
        result_type: Ty,
        throws: bool,
        span: Span
    ) -> BuildResult<FunctionId> {
        let location = ResourceLocation::new(&self.module.namespace, name)
            .map_err(|err| CompileError::construction(ErrCode::CON1009, span, err.to_string()))?;
        if self.module.function_by_location(&location).is_some() {
            return Err(CompileError::construction(
                ErrCode::CON1002,
                span,
                format!("function '{location}' is already defined")
            ));
        }
        if self.is_reserved_location(&location) {
            return Err(CompileError::construction(
                ErrCode::CON1002,
                span,
                format!("'{location}' collides with a generated procedure")
            ));
        }

        let id = FunctionId(self.module.functions.len());
        let params = params
            .into_iter()
            .map(|mut p| {
                p.quoted = p.field_kind.is_reference()
                    || matches!(self.tcx.kind(p.ty), TyKind::String | TyKind::Resource | TyKind::Selector | TyKind::Range);
                p
            })
            .collect::<Vec<Parameter>>();

        let mut func = Function {
            id,
            location: location.clone(),
            parameters: params.clone(),
            result_type,
            returns_value: !self.tcx.kind(result_type).is_void(),
            throws,
            stack_slot_counter: 0,
            span,
            tags: IndexSet::new(),
            arguments: vec![],
            values: Arena::new(),
            blocks: Arena::new(),
            block_order: vec![]
        };
        let entry = func.blocks.insert(Block::new(id));
        func.block_order.push(entry);

        let mut scopes = ScopeStack::default();
        for (index, param) in params.iter().enumerate() {
            let kind = ValueKind::Argument {
                name: param.name.clone(),
                index,
                quoted: param.quoted
            };
            let arg = func.values.insert(Value::new(kind, param.ty, param.field_kind, span));
            func.arguments.push(arg);
            let declared = scopes.declare(&param.name, Variable {
                value: arg,
                ty: param.ty,
                mutable: param.field_kind.is_mutable()
            });
            if !declared {
                return Err(CompileError::construction(
                    ErrCode::CON1002,
                    span,
                    format!("parameter '{}' is declared twice", param.name)
                ));
            }
        }

        debug!("created function {location} ({} params, throws: {throws})", params.len());
        self.module.functions.push(func);
        self.scopes.insert(id, scopes);
        self.current_function = Some(id);
        self.current_block = Some(entry);
        Ok(id)
    }

    /// Registers a function under a function tag such as `minecraft:tick`.
    pub fn add_function_tag(&mut self, function: FunctionId, tag: &str, span: Span) -> BuildResult<()> {
        let tag: ResourceLocation = tag
            .parse()
            .map_err(|err: mcc_const::ResourceLocationError| CompileError::construction(ErrCode::CON1009, span, err.to_string()))?;
        let func = self.module
            .function_mut(function)
            .ok_or_else(|| CompileError::unresolved(ErrCode::UNR3001, span, format!("{function:?}")))?;
        func.tags.insert(tag);
        Ok(())
    }

    pub fn create_block(&mut self) -> BuildResult<BlockId> {
        let func = self.current_function_mut(Span::default())?;
        let id = func.blocks.insert(Block::new(func.id));
        func.block_order.push(id);
        trace!("created block {} of {}", func.block_order.len() - 1, func.location);
        Ok(id)
    }

    pub fn switch_to_block(&mut self, block: BlockId) -> BuildResult<()> {
        let func = self.current_function_ref(Span::default())?;
        if func.block(block).is_none() {
            return Err(CompileError::construction(ErrCode::CON1001, Span::default(), "cannot switch to an erased block"));
        }
        self.current_block = Some(block);
        Ok(())
    }

    /// Makes `function` current and positions at its entry block.
    pub fn switch_to_function(&mut self, function: FunctionId) -> BuildResult<()> {
        let func = self.module
            .function(function)
            .ok_or_else(|| CompileError::unresolved(ErrCode::UNR3001, Span::default(), format!("{function:?}")))?;
        self.current_block = Some(func.entry());
        self.current_function = Some(function);
        Ok(())
    }

    pub fn is_terminated(&self, block: BlockId) -> bool {
        self.current_function
            .and_then(|f| self.module.function(f))
            .is_some_and(|f| f.is_terminated(block))
    }

    pub fn find_block(&self, location: &str) -> BuildResult<(FunctionId, BlockId)> {
        let unresolved = || CompileError::unresolved(ErrCode::UNR3002, Span::default(), location);
        let location: ResourceLocation = location.parse().map_err(|_| unresolved())?;
        self.module.find_block(&location).ok_or_else(unresolved)
    }

    /// Erases a block nobody jumps to.
    pub fn remove_block(&mut self, block: BlockId, span: Span) -> BuildResult<()> {
        let func = self.current_function_mut(span)?;
        let Some(b) = func.block(block) else {
            return Err(CompileError::construction(ErrCode::CON1001, span, "block was already erased"));
        };
        if block == func.entry() {
            return Err(CompileError::construction(ErrCode::CON1003, span, "the entry block cannot be erased"));
        }
        if !b.predecessors.is_empty() {
            return Err(CompileError::construction(
                ErrCode::CON1003,
                span,
                format!("block is still the target of {} jump(s)", b.predecessors.len())
            ));
        }
        func.erase_block(block);
        if self.current_block == Some(block) {
            self.current_block = None;
        }
        Ok(())
    }

    pub fn push_scope(&mut self) -> BuildResult<()> {
        self.scopes_mut(Span::default())?.push();
        Ok(())
    }

    pub fn pop_scope(&mut self) -> BuildResult<()> {
        if !self.scopes_mut(Span::default())?.pop() {
            return Err(CompileError::construction(ErrCode::CON1010, Span::default(), "no scope left to pop"));
        }
        Ok(())
    }

    /// Declares a local. Locals always live in a frame slot so every read
    /// of the same variable yields the same value.
    pub fn declare_variable(
        &mut self,
        name: &str,
        ty: Ty,
        mutable: bool,
        initializer: Option<ValueId>,
        span: Span
    ) -> BuildResult<ValueId> {
        if self.scopes_mut(span)?.declared_here(name) {
            return Err(CompileError::construction(ErrCode::CON1002, span, format!("'{name}' is already defined in this scope")));
        }
        if let Some(init) = initializer {
            self.check_value(init, span)?;
        }

        let slot = self.allocate(ty, mutable, span)?;
        if let Some(init) = initializer {
            self.insert(IRInstruction::Store { dst: slot, src: init }, self.tcx.void(), span)?;
        }
        self.scopes_mut(span)?.declare(name, Variable { value: slot, ty, mutable });
        Ok(slot)
    }

    /// Resolves a name: innermost scope first, then module globals, then
    /// functions used as values.
    pub fn lookup_variable(&mut self, name: &str, span: Span) -> BuildResult<ValueId> {
        if let Some(var) = self.scopes_mut(span)?.lookup(name) {
            return Ok(var.value);
        }
        if let Some(global) = self.module.globals.get(name) {
            let ty = global.ty;
            let kind = ValueKind::Global { name: name.to_string() };
            return self.add_value(kind, ty, FieldKind::MutableReference, span);
        }
        if let Some(function) = self.module.function_by_name(name) {
            let (location, ty) = match self.module.function(function) {
                Some(f) => {
                    let params = f.parameters.iter().map(|p| p.ty).collect();
                    (f.location.clone(), self.tcx.mk_ty(TyKind::Function { params, ret: f.result_type }))
                },
                None => mcc_utils::bug!("function {function:?} vanished from its module"),
            };
            return self.add_value(ValueKind::Function { function, location }, ty, FieldKind::Value, span);
        }
        Err(CompileError::unresolved(ErrCode::UNR3000, span, name))
    }

    pub fn create_global(&mut self, name: &str, ty: Ty, initializer: Option<Constant>, span: Span) -> BuildResult<()> {
        if self.module.globals.contains_key(name) {
            return Err(CompileError::construction(ErrCode::CON1002, span, format!("global '{name}' is already defined")));
        }
        self.module.globals.insert(name.to_string(), Global {
            name: name.to_string(),
            ty,
            initializer,
            span
        });
        Ok(())
    }

    /// Appends an instruction at the insertion point, adopting a use of
    /// each operand.
    pub fn insert(&mut self, inst: IRInstruction, ty: Ty, span: Span) -> BuildResult<ValueId> {
        self.insert_with_kind(inst, ty, FieldKind::Value, span)
    }

    fn insert_with_kind(&mut self, inst: IRInstruction, ty: Ty, field_kind: FieldKind, span: Span) -> BuildResult<ValueId> {
        let Some(block) = self.current_block else {
            return Err(CompileError::construction(ErrCode::CON1000, span, "no block to insert into"));
        };
        let func = self.current_function_mut(span)?;
        if func.block(block).is_none() {
            return Err(CompileError::construction(ErrCode::CON1000, span, "insertion block was erased"));
        }
        if func.is_terminated(block) {
            return Err(CompileError::construction(ErrCode::CON1007, span, "block already ends in a terminator"));
        }

        let operands = inst.operands();
        let successors = inst.successors();
        if let Some(missing) = operands.iter().find(|op| func.value(**op).is_none()) {
            return Err(CompileError::construction(ErrCode::CON1001, span, format!("operand {missing:?} is absent")));
        }
        if successors.iter().any(|b| func.block(*b).is_none()) {
            return Err(CompileError::construction(ErrCode::CON1001, span, "jump target was erased"));
        }

        for operand in &operands {
            if let Some(value) = func.value_mut(*operand) {
                value.add_use();
            }
        }
        let id = func.values.insert(Value::new(ValueKind::Instruction(inst), ty, field_kind, span));
        if let Some(b) = func.block_mut(block) {
            b.instructions.push(id);
        }
        for succ in successors {
            func.link(block, succ);
        }
        Ok(id)
    }

    /// Reserves the next frame slot. The allocation is placed at the top
    /// of the entry block so it runs before any use.
    pub fn allocate(&mut self, ty: Ty, mutable: bool, span: Span) -> BuildResult<ValueId> {
        let kind = match self.tcx.kind(ty) {
            TyKind::Array { .. } => AllocationKind::Array,
            TyKind::Object { .. } => AllocationKind::Object,
            _ => AllocationKind::Value
        };
        let field_kind = if mutable { FieldKind::MutableReference } else { FieldKind::ImmutableReference };

        let func = self.current_function_mut(span)?;
        let slot = func.stack_slot_counter;
        func.stack_slot_counter += 1;

        let id = func.values.insert(Value::new(
            ValueKind::Instruction(IRInstruction::Allocation { slot, kind }),
            ty,
            field_kind,
            span
        ));

        let entry = func.entry();
        let position = func
            .block(entry)
            .map(|b| {
                b.instructions
                    .iter()
                    .take_while(|v| matches!(func.instruction(**v), Some(IRInstruction::Allocation { .. })))
                    .count()
            })
            .unwrap_or(0);
        if let Some(b) = func.block_mut(entry) {
            b.instructions.insert(position, id);
        }
        Ok(id)
    }

    /// A frame slot that jumps can write a value into before entering a
    /// join block.
    pub fn create_branch_result(&mut self, ty: Ty, span: Span) -> BuildResult<ValueId> {
        let func = self.current_function_mut(span)?;
        let index = func.stack_slot_counter;
        func.stack_slot_counter += 1;
        let id = func.values.insert(Value::new(ValueKind::Slot { index }, ty, FieldKind::MutableReference, span));
        Ok(id)
    }

    pub fn constant(&mut self, constant: Constant, span: Span) -> BuildResult<ValueId> {
        let ty = self.tcx.type_of(&constant);
        self.add_value(ValueKind::Constant(constant), ty, FieldKind::Value, span)
    }

    pub fn external_reference(
        &mut self,
        kind: ReferenceKind,
        target: &str,
        path: &str,
        ty: Ty,
        mutable: bool,
        span: Span
    ) -> BuildResult<ValueId> {
        let field_kind = if mutable { FieldKind::MutableReference } else { FieldKind::ImmutableReference };
        let kind = ValueKind::External {
            kind,
            target: target.to_string(),
            path: path.to_string()
        };
        self.add_value(kind, ty, field_kind, span)
    }

    /// The value thrown into the landing pad currently executing.
    pub fn caught_exception(&mut self, ty: Ty, span: Span) -> BuildResult<ValueId> {
        self.add_value(ValueKind::CaughtException, ty, FieldKind::ImmutableReference, span)
    }

    pub fn argument(&self, index: usize) -> BuildResult<ValueId> {
        let func = self.current_function_ref(Span::default())?;
        func.arguments.get(index).copied().ok_or_else(|| {
            CompileError::construction(ErrCode::CON1008, func.span, format!("function has no parameter #{index}"))
        })
    }

    pub fn operation(&mut self, op: OperationOp, operands: Vec<ValueId>, span: Span) -> BuildResult<ValueId> {
        if operands.len() < 2 {
            return Err(CompileError::construction(ErrCode::CON1008, span, "an operation needs at least two operands"));
        }
        for operand in &operands {
            self.check_value(*operand, span)?;
        }

        let folded = {
            let func = self.current_function_ref(span)?;
            let constants = operands
                .iter()
                .map(|id| func.value(*id).and_then(Value::as_constant))
                .collect::<Option<Vec<&Constant>>>();
            constants.map(|consts| fold_operands(op, &consts))
        };
        match folded {
            Some(Ok(Some(constant))) => {
                debug!("folded {op:?} into {constant}");
                return self.constant(constant, span);
            },
            Some(Err(FoldError::DivisionByZero)) => {
                return Err(CompileError::construction(ErrCode::CON1008, span, "integer division by zero"));
            },
            _ => {}
        }

        let ty = self.value_ty(operands[0], span)?;
        self.insert(IRInstruction::Operation { op, operands }, ty, span)
    }

    pub fn comparison(&mut self, op: ComparisonOp, lhs: ValueId, rhs: ValueId, span: Span) -> BuildResult<ValueId> {
        let l = self.check_value(lhs, span)?.as_constant().cloned();
        let r = self.check_value(rhs, span)?.as_constant().cloned();
        if let (Some(l), Some(r)) = (&l, &r) {
            if let Some(result) = fold_comparison(op, l, r) {
                debug!("folded {l} {op:?} {r} into {result}");
                return self.constant(Constant::Boolean(result), span);
            }
        }
        self.insert(IRInstruction::Comparison { op, lhs, rhs }, self.tcx.boolean(), span)
    }

    /// Conditional jump. A constant condition becomes a direct jump.
    pub fn branch(&mut self, cond: ValueId, then_block: BlockId, else_block: BlockId, span: Span) -> BuildResult<ValueId> {
        let constant = self.check_value(cond, span)?.as_constant().and_then(Constant::as_bool);
        if let Some(taken) = constant {
            let target = if taken { then_block } else { else_block };
            debug!("branch on constant {taken} folded into a direct jump");
            return self.direct_jump(target, span);
        }
        self.insert(IRInstruction::Branch { cond, then_block, else_block }, self.tcx.void(), span)
    }

    pub fn direct_jump(&mut self, target: BlockId, span: Span) -> BuildResult<ValueId> {
        self.insert(IRInstruction::DirectJump { target, phi: None }, self.tcx.void(), span)
    }

    /// Jumps to `target`, writing `value` into the branch-result `slot` first.
    pub fn direct_jump_with(&mut self, target: BlockId, value: ValueId, slot: ValueId, span: Span) -> BuildResult<ValueId> {
        self.check_value(value, span)?;
        if !matches!(self.check_value(slot, span)?.kind, ValueKind::Slot { .. }) {
            return Err(CompileError::construction(ErrCode::CON1008, span, "jump can only carry a value into a branch result"));
        }
        let phi = Some(PhiWrite { value, slot });
        self.insert(IRInstruction::DirectJump { target, phi }, self.tcx.void(), span)
    }

    /// Multi-way jump on integer cases. A constant condition is resolved
    /// here.
    pub fn switch(&mut self, cond: ValueId, cases: Vec<(ValueId, BlockId)>, default: BlockId, span: Span) -> BuildResult<ValueId> {
        let constant = self.check_value(cond, span)?.as_constant().cloned();
        if let Some(cond_value) = constant {
            let mut target = default;
            {
                let func = self.current_function_ref(span)?;
                for (case, block) in &cases {
                    let matched = func
                        .value(*case)
                        .and_then(Value::as_constant)
                        .and_then(|c| fold_comparison(ComparisonOp::Eq, &cond_value, c));
                    if matched == Some(true) {
                        target = *block;
                        break;
                    }
                }
            }
            debug!("switch on constant {cond_value} resolved at construction");
            return self.direct_jump(target, span);
        }
        for (case, _) in &cases {
            self.check_value(*case, span)?;
        }
        self.insert(IRInstruction::Switch { cond, cases, default }, self.tcx.void(), span)
    }

    pub fn throw(&mut self, value: ValueId, landing_pad: Option<BlockId>, span: Span) -> BuildResult<ValueId> {
        self.insert(IRInstruction::Throw { value, landing_pad }, self.tcx.void(), span)
    }

    pub fn ret(&mut self, value: Option<ValueId>, span: Span) -> BuildResult<ValueId> {
        self.insert(IRInstruction::Return { value }, self.tcx.void(), span)
    }

    /// Calls `callee`, binding arguments positionally. A landing pad adds
    /// an edge from the current block.
    pub fn call(&mut self, callee: FunctionId, args: Vec<ValueId>, landing_pad: Option<BlockId>, span: Span) -> BuildResult<ValueId> {
        let target = {
            let f = self.module
                .function(callee)
                .ok_or_else(|| CompileError::unresolved(ErrCode::UNR3001, span, format!("{callee:?}")))?;
            CallTarget {
                function: callee,
                location: f.location.clone(),
                params: f.parameters.clone(),
                throws: f.throws,
                returns_value: f.returns_value
            }
        };
        if args.len() != target.params.len() {
            return Err(CompileError::construction(
                ErrCode::CON1005,
                span,
                format!("'{}' expects {} argument(s), got {}", target.location, target.params.len(), args.len())
            ));
        }

        let mut inline_args = true;
        for (param, arg) in target.params.iter().zip(args.iter()) {
            let value = self.check_value(*arg, span)?;
            if param.field_kind.is_reference() {
                if value.is_inline_operand() {
                    return Err(CompileError::construction(
                        ErrCode::CON1008,
                        span,
                        format!("argument for reference parameter '{}' must be a data location", param.name)
                    ));
                }
                if param.field_kind.is_mutable() && !value.field_kind.is_mutable() {
                    return Err(CompileError::construction(
                        ErrCode::CON1004,
                        span,
                        format!("cannot pass an immutable location as mutable '{}'", param.name)
                    ));
                }
            } else if !value.is_inline_operand() {
                inline_args = false;
            }
        }

        let ty = self.module
            .function(callee)
            .map(|f| f.result_type)
            .unwrap_or_else(|| self.tcx.void());
        self.insert(IRInstruction::Call { callee: target, args, landing_pad, inline_args }, ty, span)
    }

    pub fn call_by_name(&mut self, name: &str, args: Vec<ValueId>, landing_pad: Option<BlockId>, span: Span) -> BuildResult<ValueId> {
        let callee = self.module
            .function_by_name(name)
            .ok_or_else(|| CompileError::unresolved(ErrCode::UNR3001, span, name))?;
        self.call(callee, args, landing_pad, span)
    }

    /// `dst = src`. `dst` must be a mutable location.
    pub fn store(&mut self, dst: ValueId, src: ValueId, span: Span) -> BuildResult<ValueId> {
        self.check_mutable(dst, span)?;
        self.check_value(src, span)?;
        self.insert(IRInstruction::Store { dst, src }, self.tcx.void(), span)
    }

    pub fn member(&mut self, base: ValueId, name: &str, span: Span) -> BuildResult<ValueId> {
        let base_value = self.check_value(base, span)?;
        let (base_ty, field_kind) = (base_value.ty, base_value.field_kind);
        if let Some(constant) = base_value.as_constant() {
            let nested = constant.member(name).cloned().ok_or_else(|| {
                CompileError::construction(ErrCode::CON1008, span, format!("constant has no member '{name}'"))
            })?;
            return self.constant(nested, span);
        }
        let ty = self.tcx.field_type(base_ty, name).unwrap_or_else(|| self.tcx.void());
        let inst = IRInstruction::Member { base, name: name.to_string() };
        self.insert_with_kind(inst, ty, field_kind, span)
    }

    pub fn index(&mut self, base: ValueId, index: ValueId, span: Span) -> BuildResult<ValueId> {
        let index_const = self.check_value(index, span)?.as_constant().cloned();
        let base_value = self.check_value(base, span)?;
        let (base_ty, field_kind) = (base_value.ty, base_value.field_kind);
        if let (Some(constant), Some(i)) = (base_value.as_constant(), index_const.as_ref().and_then(Constant::as_integer)) {
            let nested = constant.index(i).cloned().ok_or_else(|| {
                CompileError::construction(ErrCode::CON1008, span, format!("index {i} is out of bounds"))
            })?;
            return self.constant(nested, span);
        }
        let ty = self.tcx.element_type(base_ty).unwrap_or_else(|| self.tcx.void());
        self.insert_with_kind(IRInstruction::Index { base, index }, ty, field_kind, span)
    }

    pub fn mutate(&mut self, target: ValueId, op: MutateOp, value: ValueId, span: Span) -> BuildResult<ValueId> {
        self.check_mutable(target, span)?;
        self.check_value(value, span)?;
        self.insert(IRInstruction::Mutate { target, op, value }, self.tcx.void(), span)
    }

    /// Removes `target[index]` and yields the removed element.
    pub fn extract(&mut self, target: ValueId, index: ValueId, span: Span) -> BuildResult<ValueId> {
        let ty = self.check_mutable(target, span)?;
        self.check_value(index, span)?;
        let ty = self.tcx.element_type(ty).unwrap_or_else(|| self.tcx.void());
        self.insert(IRInstruction::Extract { target, index }, ty, span)
    }

    pub fn remove(&mut self, target: ValueId, span: Span) -> BuildResult<ValueId> {
        self.check_mutable(target, span)?;
        self.insert(IRInstruction::Remove { target }, self.tcx.void(), span)
    }

    pub fn intrinsic(&mut self, name: &str, args: Vec<ValueId>, span: Span) -> BuildResult<ValueId> {
        let signature = lookup_intrinsic(name)
            .ok_or_else(|| CompileError::construction(ErrCode::CON1006, span, format!("unknown intrinsic '{name}'")))?;
        if !signature.accepts(args.len()) {
            return Err(CompileError::construction(
                ErrCode::CON1005,
                span,
                format!("intrinsic '{name}' does not take {} argument(s)", args.len())
            ));
        }
        for arg in &args {
            self.check_value(*arg, span)?;
        }

        match signature.kind {
            IntrinsicKind::Print => {},
            IntrinsicKind::Swap => {
                self.check_mutable(args[0], span)?;
                self.check_mutable(args[1], span)?;
            },
            IntrinsicKind::Data => {
                if !self.check_value(args[0], span)?.field_kind.is_reference() {
                    return Err(CompileError::construction(ErrCode::CON1008, span, "data target must be a location"));
                }
            },
            IntrinsicKind::Scoreboard => {
                for arg in &args[..2] {
                    if !matches!(self.check_value(*arg, span)?.as_constant(), Some(Constant::String(_))) {
                        return Err(CompileError::construction(ErrCode::CON1008, span, "score holder and objective must be string literals"));
                    }
                }
            },
            IntrinsicKind::Run => {
                let value = self.check_value(args[0], span)?;
                let accepted = matches!(value.as_constant(), Some(Constant::String(_)))
                    || matches!(value.kind, ValueKind::Argument { .. } if !value.field_kind.is_reference());
                if !accepted {
                    return Err(CompileError::construction(ErrCode::CON1008, span, "run expects a string literal or parameter"));
                }
            }
        }
        self.insert(IRInstruction::Intrinsic { kind: signature.kind, args }, self.tcx.void(), span)
    }

    pub fn command(&mut self, text: &str, side_effects: bool, span: Span) -> BuildResult<ValueId> {
        let inst = IRInstruction::Command { text: text.to_string(), side_effects };
        self.insert(inst, self.tcx.void(), span)
    }

    fn add_value(&mut self, kind: ValueKind, ty: Ty, field_kind: FieldKind, span: Span) -> BuildResult<ValueId> {
        let func = self.current_function_mut(span)?;
        Ok(func.values.insert(Value::new(kind, ty, field_kind, span)))
    }

    fn value_ty(&self, id: ValueId, span: Span) -> BuildResult<Ty> {
        Ok(self.check_value(id, span)?.ty)
    }

    fn check_value(&self, id: ValueId, span: Span) -> BuildResult<&Value> {
        self.current_function_ref(span)?
            .value(id)
            .ok_or_else(|| CompileError::construction(ErrCode::CON1001, span, format!("operand {id:?} is absent")))
    }

    /// Returns the location's type if it may be written to.
    fn check_mutable(&self, id: ValueId, span: Span) -> BuildResult<Ty> {
        let value = self.check_value(id, span)?;
        if !value.field_kind.is_mutable() {
            return Err(CompileError::construction(ErrCode::CON1004, span, "cannot write through an immutable value"));
        }
        Ok(value.ty)
    }

    fn current_function_ref(&self, span: Span) -> BuildResult<&Function> {
        self.current_function
            .and_then(|f| self.module.function(f))
            .ok_or_else(|| CompileError::construction(ErrCode::CON1000, span, "no current function"))
    }

    fn current_function_mut(&mut self, span: Span) -> BuildResult<&mut Function> {
        let Some(function) = self.current_function else {
            return Err(CompileError::construction(ErrCode::CON1000, span, "no current function"));
        };
        self.module
            .function_mut(function)
            .ok_or_else(|| CompileError::construction(ErrCode::CON1000, span, "no current function"))
    }

    fn scopes_mut(&mut self, span: Span) -> BuildResult<&mut ScopeStack> {
        self.current_function
            .and_then(|f| self.scopes.get_mut(&f))
            .ok_or_else(|| CompileError::construction(ErrCode::CON1000, span, "no current function"))
    }
}
