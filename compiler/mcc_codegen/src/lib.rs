// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod format;
pub mod generator;
pub mod lower;
pub mod package;
pub mod registers;

use mcc_mir::{BlockId, Function, ValueId};
use mcc_mir::LowerResult;

pub use generator::CommandGenerator;
pub use package::Package;

/// Turns functions of the graph into command text.
pub trait CodeGenerator {
    /// Generates every block of `func` into `package`.
    fn gen_function(&mut self, func: &Function, package: &mut Package) -> LowerResult<()>;

    /// Generates the command lines of one block.
    fn gen_block(&mut self, func: &Function, block: BlockId) -> LowerResult<Vec<String>>;

    /// Appends the commands of one instruction to `out`.
    fn gen_instruction(&mut self, func: &Function, inst: ValueId, out: &mut Vec<String>) -> LowerResult<()>;
}
