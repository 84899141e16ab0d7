// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::resource::ResourceLocation;
use crate::selector::TargetSelector;

/// Compile-time value payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Boolean(bool),
    Integer(i32),
    Float(f64),
    String(String),
    Resource(ResourceLocation),

    /// Float range with optional bounds, e.g. `1..`, `..5.5`.
    Range(Option<f64>, Option<f64>),
    Array(Vec<Constant>),
    Object(IndexMap<String, Constant>),
    Selector(TargetSelector),
}

impl Constant {
    /// Renders the constant as SNBT, the form `data modify ... value` and
    /// macro argument objects accept.
    pub fn to_snbt(&self) -> String {
        match self {
            Constant::Boolean(true) => String::from("1b"),
            Constant::Boolean(false) => String::from("0b"),
            Constant::Integer(value) => value.to_string(),
            Constant::Float(value) => format!("{value}d"),
            Constant::String(value) => quote(value),
            Constant::Resource(loc) => quote(&loc.to_string()),
            Constant::Range(..) => quote(&self.to_plain_text()),
            Constant::Selector(sel) => quote(&sel.to_string()),
            Constant::Array(items) => {
                format!("[{}]", items.iter().map(Constant::to_snbt).join(","))
            },
            Constant::Object(fields) => {
                let body = fields
                    .iter()
                    .map(|(key, value)| format!("{}:{}", snbt_key(key), value.to_snbt()))
                    .join(",");
                format!("{{{body}}}")
            }
        }
    }

    /// Text as it would appear in chat: strings unquoted, everything else in
    /// its SNBT form.
    pub fn to_plain_text(&self) -> String {
        match self {
            Constant::String(value) => value.clone(),
            Constant::Boolean(value) => value.to_string(),
            Constant::Resource(loc) => loc.to_string(),
            Constant::Selector(sel) => sel.to_string(),
            Constant::Range(lo, hi) => {
                let lo = lo.map(|v| v.to_string()).unwrap_or_default();
                let hi = hi.map(|v| v.to_string()).unwrap_or_default();
                format!("{lo}..{hi}")
            },
            _ => self.to_snbt()
        }
    }

    /// A JSON string holding the plain text, embeddable in a text component.
    pub fn to_json_text(&self) -> String {
        json_quote(&self.to_plain_text())
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Constant::Integer(value) => Some(*value),
            Constant::Boolean(value) => Some(*value as i32),
            _ => None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Boolean(value) => Some(*value),
            Constant::Integer(value) => Some(*value != 0),
            _ => None
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Constant::Integer(_) | Constant::Float(_))
    }

    /// `obj.name` on an object constant.
    pub fn member(&self, name: &str) -> Option<&Constant> {
        match self {
            Constant::Object(fields) => fields.get(name),
            _ => None
        }
    }

    /// `arr[i]` on an array constant. Negative indices count from the end.
    pub fn index(&self, index: i32) -> Option<&Constant> {
        match self {
            Constant::Array(items) => {
                let idx = if index < 0 {
                    items.len().checked_sub(index.unsigned_abs() as usize)?
                } else {
                    index as usize
                };
                items.get(idx)
            },
            _ => None
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_snbt())
    }
}

impl From<i32> for Constant {
    fn from(value: i32) -> Self {
        Constant::Integer(value)
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Constant::Boolean(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Constant::String(value.to_string())
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch)
        }
    }
    out.push('"');
    out
}

fn json_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c)
        }
    }
    out.push('"');
    out
}

fn snbt_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'));
    if bare { key.to_string() } else { quote(key) }
}
