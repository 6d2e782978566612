use axon_util::Span;
use thiserror::Error;

/// Failures raised while turning a token stream into an AST (spec §4.2,
/// §7). The parser never tries to recover; the first error wins.
#[derive(Debug, Error, PartialEq, Clone)]
#[error("{message} at {span}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}
