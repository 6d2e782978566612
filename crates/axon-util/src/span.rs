//! Source positions shared by every stage of the pipeline.
//!
//! The lexer stamps every token with a [`Span`]; the parser copies it onto
//! AST nodes that can fail to compile; the compiler and VM thread it
//! through to error sites so `LexError`/`ParseError`/`CompileError`/
//! `RuntimeError` can all report `{line, column}` the same way.

use std::fmt;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The position just before any input has been consumed.
    pub const fn start() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
