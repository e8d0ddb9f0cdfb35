//! loxscan_options: Scanner options and the `loxscan.json` driver config.
//!
//! The scanner itself only needs [`ScanOptions`]. The driver reads a
//! [`DriverConfig`] from JSON and lets command-line flags override it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Name of the config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "loxscan.json";

/// The number given to the first line of a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LineBase {
    /// First line is line 0.
    Zero,
    /// First line is line 1.
    #[default]
    One,
}

impl LineBase {
    /// The line number of the first line.
    pub fn first_line(self) -> u32 {
        match self {
            LineBase::Zero => 0,
            LineBase::One => 1,
        }
    }
}

impl TryFrom<u8> for LineBase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LineBase::Zero),
            1 => Ok(LineBase::One),
            other => Err(format!("line base must be 0 or 1, got {}", other)),
        }
    }
}

impl From<LineBase> for u8 {
    fn from(base: LineBase) -> Self {
        base.first_line() as u8
    }
}

impl FromStr for LineBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("line base must be 0 or 1, got '{}'", s))?;
        LineBase::try_from(value)
    }
}

/// Options that change how a source text is scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ScanOptions {
    pub line_base: LineBase,
}

impl ScanOptions {
    pub fn with_line_base(line_base: LineBase) -> Self {
        Self { line_base }
    }
}

/// How the driver prints scanned tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `KIND lexeme literal` line per token.
    #[default]
    Text,
    /// The token list as a JSON array.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format '{}', expected 'text' or 'json'", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// The `loxscan.json` file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DriverConfig {
    pub line_base: LineBase,
    pub format: OutputFormat,
}

impl DriverConfig {
    /// The scanner-facing part of the config.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::with_line_base(self.line_base)
    }
}

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a driver config from a JSON string.
pub fn parse_config(content: &str) -> Result<DriverConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse a driver config from a file.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<DriverConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Load the config named on the command line, else `loxscan.json` in `dir`
/// when it exists, else the defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<DriverConfig, ConfigError> {
    if let Some(path) = explicit {
        return parse_config_file(path);
    }
    let implicit = dir.join(DEFAULT_CONFIG_FILE);
    if implicit.is_file() {
        return parse_config_file(implicit);
    }
    Ok(DriverConfig::default())
}
