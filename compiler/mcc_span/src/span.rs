// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

/// Represents a continuous range in a source file.
/// Both start and end are inclusive positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// File identifier 
    pub file_id: usize,

    /// Starting position (line and column).
    pub start: SourcePos,

    /// Ending position (line and column).
    pub end: SourcePos,
}

impl Span {
    pub fn new(file: usize, start: SourcePos, end: SourcePos) -> Self {
        Self {
            file_id: file,
            start,
            end
        }
    }

    /// A single-position span on `line`:`column` of file 0.
    pub fn point(line: usize, column: usize) -> Self {
        let pos = SourcePos { line, column };
        Self::new(0, pos, pos)
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column + 1)
    }
}

/// A trait for types that provide access to a source code span.
///
/// Implementors of this trait can return a reference to their associated `Span`,
/// which represents the location in the source code corresponding to the item.
pub trait HasSpan {
    fn span(&self) -> &Span;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_starts_and_ends_at_the_same_position() {
        let span = Span::point(2, 4);
        assert_eq!(span.start, SourcePos { line: 2, column: 4 });
        assert_eq!(span.start, span.end);
    }

    #[test]
    fn test_span_display_is_one_based_column() {
        assert_eq!(Span::point(3, 0).to_string(), "3:1");
    }
}
