//! Runtime configuration: defaults, then an optional TOML file, then
//! command-line / environment overrides applied by the CLI.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::LedgerLayout;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where newly created accounts keep their ledger.
    pub layout: LedgerLayout,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        };
        write!(f, "{s}")
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&raw)
                    .with_context(|| format!("Invalid config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse TOML")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.layout, LedgerLayout::History);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Compact);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("layout = \"inline\"\n").unwrap();
        assert_eq!(config.layout, LedgerLayout::Inline);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let raw = r#"
            layout = "history"

            [log]
            level = "tinyledger=debug"
            format = "json"
        "#;
        let config = Config::from_toml(raw).unwrap();
        assert_eq!(config.layout, LedgerLayout::History);
        assert_eq!(config.log.level, "tinyledger=debug");
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(Config::from_toml("layout = \"sqlite\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "layout = \"inline\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.layout, LedgerLayout::Inline);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
