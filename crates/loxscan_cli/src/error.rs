//! Driver errors and their process exit codes.

use loxscan_options::ConfigError;
use rustyline::error::ReadlineError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes, following the BSD `sysexits.h` convention.
pub mod exit {
    pub const USAGE: u8 = 64;
    pub const DATA_ERR: u8 = 65;
    pub const NO_INPUT: u8 = 66;
    pub const IO_ERR: u8 = 74;
    pub const CONFIG: u8 = 78;
}

/// Errors that stop the driver before or around scanning.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("'{}' is not valid UTF-8", .path.display())]
    InvalidUtf8 { path: PathBuf },

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),

    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) => exit::CONFIG,
            CliError::Read { .. } | CliError::InvalidUtf8 { .. } => exit::NO_INPUT,
            CliError::Output(_) | CliError::Readline(_) => exit::IO_ERR,
        }
    }
}
