//! Interactive REPL: `axon repl`, or `axon` with no file argument
//! (SPEC_FULL.md §6). Prompt text and flush-on-print behavior are
//! carried over from the original implementation's `repl.py` (see
//! SPEC_FULL.md's supplemented behaviors).

use anyhow::Result;
use axon_vm::{VmOptions, VM};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

use crate::config::Config;
use crate::pipeline::run_source;

const PROMPT: &str = ">> ";

/// Runs the read-eval-print loop until `Ctrl-D`/`Ctrl-C` or an
/// unrecoverable line-editor error. Every accepted line runs against the
/// same persistent [`VM`], so `let`-bound names survive across prompts.
pub fn run_repl(config: &Config) -> Result<i32> {
    let mut editor = DefaultEditor::new()?;
    if editor.load_history(&config.history_file).is_err() {
        // No history file yet; that's fine, not an error the user needs
        // to see.
    }

    let mut vm = VM::with_options(VmOptions {
        allow_clear_screen: config.allow_clear_screen,
    });

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str()).ok();
                if let Err(err) = run_source(&line, &mut vm) {
                    eprintln!("{}", err.render());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                warn!(%err, "line editor error, exiting REPL");
                break;
            }
        }
    }

    if let Some(parent) = config.history_file.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    editor.save_history(&config.history_file).ok();

    Ok(0)
}
