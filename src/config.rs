//! CLI configuration.
//!
//! Looked up in `./dotq.toml`, then `<config dir>/dotq/config.toml`.
//! Every key is optional:
//!
//! ```toml
//! format = "json"   # or "pretty"
//! color = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{QueryError, QueryResult};

const LOCAL_CONFIG: &str = "dotq.toml";

/// How parsed queries are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented condition tree
    #[default]
    Pretty,
    /// Query JSON, accepted back by `dotq build`
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
        }
    }
}

impl CliConfig {
    /// Load the first config file found, or defaults if there is none.
    pub fn load() -> QueryResult<Self> {
        match locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> QueryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| QueryError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> QueryResult<Self> {
        toml::from_str(content).map_err(|e| QueryError::Config(e.to_string()))
    }
}

fn locate() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("dotq").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(CliConfig::from_toml("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = CliConfig::from_toml("format = \"json\"").unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.color);
    }

    #[test]
    fn test_invalid_format() {
        let err = CliConfig::from_toml("format = \"xml\"").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }
}
