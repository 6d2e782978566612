use axon_util::Span;
use thiserror::Error;

/// Failures raised while turning source text into tokens (spec §4.1, §7).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LexError {
    #[error("unrecognized character '{ch}' at {span}")]
    UnrecognizedChar { ch: char, span: Span },

    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnrecognizedChar { span, .. } => *span,
            LexError::UnterminatedString { span, .. } => *span,
        }
    }
}
