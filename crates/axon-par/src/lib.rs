//! axon-par — turns a token stream into an AST (spec §4.2).

pub mod ast;
pub mod error;
mod parser;

pub use ast::{BinOpKind, Expr, NumberLit, Program, Stmt, UnaryOpKind};
pub use error::ParseError;
pub use parser::{parse, Parser};

use thiserror::Error;

/// Combines the two stages a caller usually wants run back to back
/// (lex, then parse) without conflating their distinct error taxonomies
/// (spec §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrontendError {
    #[error(transparent)]
    Lex(#[from] axon_lex::LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
