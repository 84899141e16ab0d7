// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Block,
    Entity,
    Storage,
}

impl ReferenceKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ReferenceKind::Block => "block",
            ReferenceKind::Entity => "entity",
            ReferenceKind::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// Text usable verbatim where a value is expected.
    Literal(String),

    /// A dereferenceable data path.
    Reference {
        kind: ReferenceKind,
        target: String,
        path: String,
    },

    /// A by-value parameter, substituted when the procedure is invoked
    /// with arguments. `quoted` parameters are substituted inside quotes.
    MacroArgument {
        name: String,
        quoted: bool,
    },
}

/// Where a value currently resides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IRResult {
    pub kind: ResultKind,

    /// Any command mentioning this result must be a macro line.
    pub with_argument: bool,
}

impl IRResult {
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Literal(text.into()),
            with_argument: false
        }
    }

    pub fn reference(kind: ReferenceKind, target: &str, path: &str) -> Self {
        Self {
            kind: ResultKind::Reference {
                kind,
                target: target.to_string(),
                path: path.to_string()
            },
            with_argument: false
        }
    }

    pub fn storage(target: &str, path: &str) -> Self {
        Self::reference(ReferenceKind::Storage, target, path)
    }

    pub fn macro_argument(name: &str, quoted: bool) -> Self {
        Self {
            kind: ResultKind::MacroArgument {
                name: name.to_string(),
                quoted
            },
            with_argument: true
        }
    }

    pub fn with_argument(mut self, with_argument: bool) -> Self {
        self.with_argument = with_argument;
        self
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, ResultKind::Reference { .. })
    }

    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            ResultKind::Reference { path, .. } => Some(path),
            _ => None
        }
    }

    /// Extends a reference path. Literals and macro arguments have no path.
    pub fn extend_path(&self, suffix: &str) -> Option<IRResult> {
        match &self.kind {
            ResultKind::Reference { kind, target, path } => Some(Self {
                kind: ResultKind::Reference {
                    kind: *kind,
                    target: target.clone(),
                    path: format!("{path}{suffix}")
                },
                with_argument: self.with_argument
            }),
            _ => None
        }
    }

    /// JSON text component form, for embedding in chat output.
    pub fn stringified(self) -> IRResult {
        let with_argument = self.with_argument;
        let text = match self.kind {
            ResultKind::Literal(text) => text,
            ResultKind::Reference { kind, target, path } => format!(
                "{{\"{}\":\"{}\",\"nbt\":\"{}\"}}",
                kind.keyword(),
                escape_json(&target),
                escape_json(&path)
            ),
            ResultKind::MacroArgument { name, .. } => format!("\"$({name})\""),
        };
        IRResult::literal(text).with_argument(with_argument)
    }
}

/// The text a macro substitutes for `name`.
pub fn macro_placeholder(name: &str, quoted: bool) -> String {
    if quoted {
        format!("\"$({name})\"")
    } else {
        format!("$({name})")
    }
}

fn escape_json(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
