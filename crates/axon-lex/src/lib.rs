//! axon-lex — the Axon lexer (spec §4.1).
//!
//! Converts source text into a finite stream of [`Token`]s terminated by
//! an `Eof` token. Single left-to-right pass, no lookahead beyond what a
//! handful of two-character operators need.

mod cursor;
mod error;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use error::LexError;
pub use lexer::Lexer;
pub use token::{keyword, Token, TokenKind};
