// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Operand syntax shared by every lowering. A line that mentions a macro
//! argument anywhere must be emitted as a macro line.

use itertools::Itertools;
use mcc_errors::{CompileError, ErrCode};
use mcc_mir::result::{macro_placeholder, IRResult, ResultKind};
use mcc_mir::LowerResult;
use mcc_span::Span;

/// Prefixes `text` with `$` when it has to be a macro line.
pub fn line(with_argument: bool, text: String) -> String {
    if with_argument {
        format!("${text}")
    } else {
        text
    }
}

/// Right-hand side of `data modify ... set`: `value <lit>`,
/// `from <kind> <target> <path>` or `value $(name)`.
pub fn data_source(result: &IRResult) -> String {
    match &result.kind {
        ResultKind::Literal(text) => format!("value {text}"),
        ResultKind::Reference { kind, target, path } => format!("from {} {target} {path}", kind.keyword()),
        ResultKind::MacroArgument { name, quoted } => format!("value {}", macro_placeholder(name, *quoted)),
    }
}

/// A writable data location: `<kind> <target> <path>`.
pub fn data_target(result: &IRResult, span: Span) -> LowerResult<String> {
    match &result.kind {
        ResultKind::Reference { kind, target, path } => Ok(format!("{} {target} {path}", kind.keyword())),
        _ => Err(CompileError::lowering(ErrCode::LOW2000, span, "destination is not a data location"))
    }
}

/// Integer text of a literal result, if it has one. Booleans count as 0/1.
pub fn literal_int(result: &IRResult) -> Option<i32> {
    let ResultKind::Literal(text) = &result.kind else {
        return None;
    };
    match text.as_str() {
        "1b" | "true" => Some(1),
        "0b" | "false" => Some(0),
        _ => text.parse().ok()
    }
}

/// Command loading `result` into the score of `holder`.
pub fn score_load(holder: &str, objective: &str, result: &IRResult, span: Span) -> LowerResult<String> {
    let text = match &result.kind {
        ResultKind::Literal(_) => {
            let value = literal_int(result).ok_or_else(|| {
                CompileError::lowering(ErrCode::LOW2000, span, "only integer literals can be loaded into a score")
            })?;
            format!("scoreboard players set {holder} {objective} {value}")
        },
        ResultKind::Reference { kind, target, path } => {
            format!("execute store result score {holder} {objective} run data get {} {target} {path}", kind.keyword())
        },
        ResultKind::MacroArgument { name, .. } => {
            format!("scoreboard players set {holder} {objective} $({name})")
        }
    };
    Ok(line(result.with_argument, text))
}

/// Literal macro argument object, ` {a:1,b:$(x)}`, or nothing if empty.
pub fn macro_object(entries: &[(String, String)]) -> String {
    if entries.is_empty() {
        return String::new();
    }
    let body = entries.iter().map(|(key, value)| format!("{key}:{value}")).join(",");
    format!(" {{{body}}}")
}
