use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "fatura.toml";

/// Batch defaults so recurring runs don't need the full flag set. CLI flags
/// always win over the file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Config {
    pub account: Option<String>,
    pub due_date: Option<String>,
    pub suppliers: Option<PathBuf>,
    pub categories: Option<PathBuf>,
}

/// An explicitly named config file must exist; the default one is optional.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => read(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                read(default)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn read(path: &Path) -> Result<Config> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}
