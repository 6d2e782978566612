//! `axon` — the command-line driver for the Axon language (SPEC_FULL.md
//! §6), adapted from the teacher's `clap`-derive + `tracing` driver shape.

mod config;
mod error;
mod pipeline;
mod repl;
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "axon", version, about = "Run or explore Axon scripts")]
struct Cli {
    /// Enable debug-level logging (overridden by the AXON_LOG env var).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to an axon.toml config file; defaults to ./axon.toml or
    /// ~/axon.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// A script to run directly, equivalent to `axon run <path>`. Only
    /// consulted when no subcommand is given.
    path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a script file to completion.
    Run { path: PathBuf },
    /// Start the interactive read-eval-print loop.
    Repl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let exit_code = match (cli.command, cli.path) {
        (Some(Commands::Run { path }), _) => runner::run_file(&path, &config)?,
        (Some(Commands::Repl), _) => repl::run_repl(&config)?,
        (None, Some(path)) => runner::run_file(&path, &config)?,
        (None, None) => repl::run_repl(&config)?,
    };

    std::process::exit(exit_code);
}

/// Initializes `tracing`, mirroring the teacher's `init_logging`:
/// `-v`/`--verbose` selects the `debug` filter, otherwise `info`, and
/// the `AXON_LOG` environment variable overrides both when set.
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("AXON_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_subcommand_with_path() {
        let cli = Cli::parse_from(["axon", "run", "script.axon"]);
        match cli.command {
            Some(Commands::Run { path }) => assert_eq!(path, PathBuf::from("script.axon")),
            other => panic!("expected Run command, got {other:?}"),
        }
    }

    #[test]
    fn parses_repl_subcommand() {
        let cli = Cli::parse_from(["axon", "repl"]);
        assert!(matches!(cli.command, Some(Commands::Repl)));
    }

    #[test]
    fn bare_path_with_no_subcommand_falls_through_to_path_field() {
        let cli = Cli::parse_from(["axon", "script.axon"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.path, Some(PathBuf::from("script.axon")));
    }

    #[test]
    fn no_arguments_leaves_both_command_and_path_empty() {
        let cli = Cli::parse_from(["axon"]);
        assert!(cli.command.is_none());
        assert!(cli.path.is_none());
    }

    #[test]
    fn parses_global_verbose_flag_before_subcommand() {
        let cli = Cli::parse_from(["axon", "--verbose", "repl"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parses_short_verbose_flag() {
        let cli = Cli::parse_from(["axon", "-v", "repl"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parses_global_config_flag() {
        let cli = Cli::parse_from(["axon", "--config", "/path/to/axon.toml", "repl"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/axon.toml")));
    }

    #[test]
    fn defaults_verbose_to_false_and_config_to_none() {
        let cli = Cli::parse_from(["axon", "repl"]);
        assert!(!cli.verbose);
        assert_eq!(cli.config, None);
    }
}
