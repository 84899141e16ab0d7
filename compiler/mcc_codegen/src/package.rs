// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use mcc_const::ResourceLocation;
use mcc_errors::{CompileError, ErrCode};
use mcc_mir::LowerResult;
use mcc_span::Span;

/// Output of the command generator. Writing it to disk is up to the caller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Package {
    pub functions: IndexMap<ResourceLocation, Vec<String>>,
    pub tags: IndexMap<ResourceLocation, IndexSet<ResourceLocation>>,
}

impl Package {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails if `location` already holds a procedure.
    pub fn add_function(&mut self, location: ResourceLocation, lines: Vec<String>, span: Span) -> LowerResult<()> {
        match self.functions.entry(location) {
            Entry::Occupied(entry) => Err(CompileError::lowering(
                ErrCode::LOW2002,
                span,
                format!("procedure '{}' is emitted twice", entry.key())
            )),
            Entry::Vacant(entry) => {
                entry.insert(lines);
                Ok(())
            }
        }
    }

    pub fn tag(&mut self, tag: ResourceLocation, function: ResourceLocation) {
        self.tags.entry(tag).or_default().insert(function);
    }

    /// Lines of the procedure at `location`, e.g. `"demo:main/1"`.
    pub fn lines(&self, location: &str) -> Option<&[String]> {
        let location: ResourceLocation = location.parse().ok()?;
        self.functions.get(&location).map(Vec::as_slice)
    }

    /// Human-readable dump, one `# location` header per procedure.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (location, lines) in &self.functions {
            out.push_str(&format!("# {location}\n"));
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
        }
        for (tag, members) in &self.tags {
            out.push_str(&format!("# tag {tag}\n"));
            for member in members {
                out.push_str(&format!("{member}\n"));
            }
        }
        out
    }
}
