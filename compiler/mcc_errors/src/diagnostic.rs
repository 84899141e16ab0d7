// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use mcc_span::Span;

use crate::code::ErrCode;
use crate::error::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Help,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code:               Option<ErrCode>,
    pub severity:           Severity,
    pub primary_span:       Span,
    pub message:            String,
    pub notes:              Vec<String>,
}

impl From<&CompileError> for Diagnostic {
    fn from(err: &CompileError) -> Self {
        let message = match err {
            CompileError::Construction { message, .. }
            | CompileError::Lowering { message, .. } => message.clone(),
            CompileError::UnresolvedReference { name, .. } => format!("cannot resolve '{name}'"),
        };
        let notes = match err {
            CompileError::Lowering { .. } => vec![String::from("this is a builder or type-system contract violation")],
            _ => vec![],
        };
        Self {
            code: Some(err.code()),
            severity: Severity::Error,
            primary_span: err.span(),
            message,
            notes
        }
    }
}

impl Diagnostic {
    /// Renders the diagnostic against the source text it points into.
    pub fn render(&self, path: &str, source: &str) -> String {
        let mut out = String::new();
        let line_num = self.primary_span.start.line;   // 1-based
        let col_num = self.primary_span.start.column;  // 0-based
        let span_len = if self.primary_span.end.line == line_num {
            self.primary_span.end.column.saturating_sub(col_num)
        } else {
            1
        };

        let code = self.code.map(|c| format!("[{c:?}]")).unwrap_or_default();
        out.push_str(&format!("{:?}{code}: {}\n", self.severity, self.message));
        out.push_str(&format!(" --> {}:{}:{}\n", path, line_num, col_num + 1));
        out.push_str("  |\n");

        let source_line = source.lines().nth(line_num.saturating_sub(1)).unwrap_or("");
        out.push_str(&format!("{: >4} | {}\n", line_num, source_line));

        let caret_line = " ".repeat(col_num) + &"^".repeat(span_len.max(1));
        out.push_str(&format!("     | {}\n", caret_line));
        for note in &self.notes {
            out.push_str(&format!("     = note: {note}\n"));
        }
        out
    }
}
