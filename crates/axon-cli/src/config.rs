//! Configuration for the `axon` driver (SPEC_FULL.md §1).
//!
//! An optional `axon.toml`, resolved in the order CLI flag > config file
//! > built-in default, adapted from `faxt::config::Config`'s
//! find-then-load pattern but scoped to the two knobs Axon actually
//! needs: where the REPL keeps its history, and whether `cls` may touch
//! the real terminal.

use std::path::{Path, PathBuf};

use dirs::home_dir;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

pub const CONFIG_FILE_NAME: &str = "axon.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Where the REPL persists its line-editing history.
    #[serde(default = "default_history_path")]
    pub history_file: PathBuf,

    /// Whether the `cls` statement is allowed to clear the real
    /// terminal. Disabling it makes `cls` a no-op, useful when Axon is
    /// embedded somewhere a clear-screen escape would be unwelcome.
    #[serde(default = "default_true")]
    pub allow_clear_screen: bool,
}

fn default_history_path() -> PathBuf {
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".axon_history")
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_file: default_history_path(),
            allow_clear_screen: true,
        }
    }
}

impl Config {
    /// Searches the current directory, then the user's home directory,
    /// for `axon.toml`; falls back to [`Config::default`] if neither
    /// exists.
    pub fn load() -> Result<Self, CliError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    fn find_config_file() -> Option<PathBuf> {
        let cwd_candidate = PathBuf::from(CONFIG_FILE_NAME);
        if cwd_candidate.exists() {
            return Some(cwd_candidate);
        }
        home_dir()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_allows_clear_screen() {
        let config = Config::default();
        assert!(config.allow_clear_screen);
    }

    #[test]
    fn load_from_path_parses_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("axon.toml");
        std::fs::write(&path, "allow_clear_screen = false\n").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert!(!config.allow_clear_screen);
    }

    #[test]
    fn load_from_missing_path_is_an_error() {
        let result = Config::load_from_path(Path::new("/nonexistent/axon.toml"));
        assert!(result.is_err());
    }
}
