//! axon-util — shared foundation types for the Axon pipeline.
//!
//! Every other crate in the workspace depends on this one for source
//! positions (`Span`), interned identifiers (`Symbol`), and the common
//! one-line diagnostic format used by `LexError`, `ParseError`,
//! `CompileError`, and `RuntimeError`.

pub mod diagnostic;
pub mod span;
pub mod symbol;

pub use span::Span;
pub use symbol::Symbol;
