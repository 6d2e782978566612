//! Shared rendering for the one-line diagnostics every pipeline stage
//! produces (spec §7): `<Kind>: <detail>` or `<Kind>: <detail> at
//! <line>:<column>` when a position is available.

use std::fmt;

use crate::span::Span;

/// Render a diagnostic line the way the file runner and REPL both print
/// errors to the user.
pub fn render(kind: &str, detail: &dyn fmt::Display, span: Option<Span>) -> String {
    match span {
        Some(span) => format!("{kind}: {detail} at {span}"),
        None => format!("{kind}: {detail}"),
    }
}
