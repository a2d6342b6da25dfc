//! Optional YAML defaults read from `$HOME/.kubesqlrc` or `--config`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::output::OutputFormat;

/// File name looked up in the home directory.
pub const CONFIG_FILE: &str = ".kubesqlrc";

/// Defaults that command-line flags override.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format when `--format` is not given.
    pub format: Option<OutputFormat>,
    /// Log filter directive, e.g. `warn` or `kubesql_parser=debug`.
    pub log_level: Option<String>,
}

impl Config {
    /// Load the explicit file, or the home-directory file when it exists.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read and decode a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("decode config {}", path.display()))
    }

    /// Decode config text; an empty document yields defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

fn default_path() -> Option<PathBuf> {
    BaseDirs::new().map(|b| b.home_dir().join(CONFIG_FILE))
}
