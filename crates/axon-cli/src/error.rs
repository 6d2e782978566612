//! Driver-level error glue.
//!
//! The library crates (`axon-lex`, `axon-par`, `axon-compile`, `axon-vm`)
//! each expose a precise `thiserror` enum. This binary aggregates them
//! with `anyhow` (per SPEC_FULL.md §1, mirroring the teacher's
//! `faxt`/`faxc-drv` split) and renders the one line spec.md §7 requires:
//! `<Kind>: <detail>` or `<Kind>: <detail> at <line>:<column>`.

use axon_par::FrontendError;
use axon_util::diagnostic::render;
use thiserror::Error;

/// Driver-only failures that never flow through the language pipeline
/// (config loading, history-file I/O).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Renders any pipeline-stage failure as the single diagnostic line the
/// file runner and REPL both print to stderr.
pub fn render_pipeline_error(err: &FrontendError) -> String {
    match err {
        FrontendError::Lex(e) => render("LexError", e, Some(e.span())),
        FrontendError::Parse(e) => render("ParseError", &e.message, Some(e.span)),
    }
}

pub fn render_compile_error(err: &axon_compile::CompileError) -> String {
    render("CompileError", err, None)
}

pub fn render_runtime_error(err: &axon_vm::RuntimeError) -> String {
    // RuntimeError's own Display already begins with its kind
    // (`NameError: ...`, `TypeError: ...`), so there is no separate
    // "kind" to pass here; spans aren't tracked at this stage (see
    // DESIGN.md).
    err.to_string()
}
