// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use itertools::Itertools;

use mcc_const::Constant;
use mcc_errors::{CompileError, ErrCode};
use mcc_mir::intrinsics::IntrinsicKind;
use mcc_mir::result::ResultKind;
use mcc_mir::{Function, LowerResult, Value, ValueId};
use mcc_span::Span;

use crate::format::{data_source, data_target, line, score_load};
use crate::generator::CommandGenerator;

impl<'m> CommandGenerator<'m> {
    fn string_constant(&self, func: &Function, id: ValueId, span: Span) -> LowerResult<String> {
        match func.value(id).and_then(Value::as_constant) {
            Some(Constant::String(text)) => Ok(text.clone()),
            _ => Err(CompileError::lowering(ErrCode::LOW2000, span, "expected a string literal"))
        }
    }

    pub(crate) fn lower_intrinsic(
        &self,
        func: &Function,
        kind: IntrinsicKind,
        args: &[ValueId],
        span: Span,
        out: &mut Vec<String>
    ) -> LowerResult<()> {
        match kind {
            IntrinsicKind::Print => {
                let components = args
                    .iter()
                    .map(|a| func.generate_result(*a, self.layout, true))
                    .collect::<LowerResult<Vec<_>>>()?;
                let with_argument = components.iter().any(|c| c.with_argument);
                let body = components
                    .iter()
                    .map(|c| match &c.kind {
                        ResultKind::Literal(text) => text.clone(),
                        _ => String::from("\"\"")
                    })
                    .join(",");
                out.push(line(with_argument, format!("tellraw @a [{body}]")));
            },
            IntrinsicKind::Swap => {
                let a = self.result(func, args[0])?;
                let b = self.result(func, args[1])?;
                let (a_target, b_target) = (data_target(&a, span)?, data_target(&b, span)?);
                let scratch = self.storage(&self.layout.scratch);
                out.push(line(a.with_argument, format!("data modify {scratch} set from {a_target}")));
                out.push(line(a.with_argument || b.with_argument, format!("data modify {a_target} set from {b_target}")));
                out.push(line(b.with_argument, format!("data modify {b_target} set from {scratch}")));
            },
            IntrinsicKind::Data => {
                let target = self.result(func, args[0])?;
                let value = self.result(func, args[1])?;
                out.push(line(
                    target.with_argument || value.with_argument,
                    format!("data modify {} set {}", data_target(&target, span)?, data_source(&value))
                ));
            },
            IntrinsicKind::Scoreboard => {
                let holder = self.string_constant(func, args[0], span)?;
                let objective = self.string_constant(func, args[1], span)?;
                let value = self.result(func, args[2])?;
                out.push(score_load(&holder, &objective, &value, span)?);
            },
            IntrinsicKind::Run => {
                let command = self.result(func, args[0])?;
                match &command.kind {
                    ResultKind::MacroArgument { name, .. } => out.push(format!("$$({name})")),
                    _ => out.push(self.string_constant(func, args[0], span)?)
                }
            }
        }
        Ok(())
    }
}
