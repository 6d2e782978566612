//! File runner: `axon run <path>` / `axon <path>` (SPEC_FULL.md §6).

use std::path::Path;

use anyhow::{Context, Result};
use axon_vm::{VmOptions, VM};
use tracing::debug;

use crate::config::Config;
use crate::pipeline::run_source;

/// Reads `path` fully as UTF-8, then runs it to completion. Exits the
/// process with status 0 on success; on any stage error, prints the
/// spec.md §7 diagnostic line to stderr and returns a non-zero exit
/// code to the caller instead of exiting here, so `main` controls the
/// process exit point.
pub fn run_file(path: &Path, config: &Config) -> Result<i32> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(bytes = source.len(), path = %path.display(), "read source file");

    let mut vm = VM::with_options(VmOptions {
        allow_clear_screen: config.allow_clear_screen,
    });

    match run_source(&source, &mut vm) {
        Ok(()) => Ok(0),
        Err(err) => {
            eprintln!("{}", err.render());
            Ok(1)
        }
    }
}
