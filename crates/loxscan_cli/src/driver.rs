//! Batch mode: read files, scan them, print tokens and diagnostics.

use crate::error::{exit, CliError};
use loxscan_diagnostics::{render_fancy, Diagnostic};
use loxscan_options::{OutputFormat, ScanOptions};
use loxscan_scanner::{scan_with_options, ScanResult, Token};
use rayon::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Settings resolved from the config file and command-line flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub options: ScanOptions,
    pub format: OutputFormat,
    /// Render diagnostics as graphical reports instead of one-liners.
    pub fancy: bool,
    /// Use ANSI colors in graphical reports.
    pub color: bool,
}

/// One scanned input file.
#[derive(Debug)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub source: String,
    pub result: ScanResult,
}

impl ScannedFile {
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Serialize)]
struct FileTokens<'a> {
    file: String,
    tokens: &'a [Token],
}

/// Read a source file, checking that it is UTF-8.
pub fn read_source(path: &Path) -> Result<String, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = simdutf8::basic::from_utf8(&bytes).map_err(|_| CliError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read source");
    Ok(text.to_owned())
}

/// Read and scan every file in parallel, keeping input order.
pub fn scan_files(paths: &[PathBuf], options: ScanOptions) -> Vec<Result<ScannedFile, CliError>> {
    info!(files = paths.len(), "scanning");
    paths
        .par_iter()
        .map(|path| {
            let source = read_source(path)?;
            let result = scan_with_options(&source, options);
            Ok(ScannedFile {
                path: path.clone(),
                source,
                result,
            })
        })
        .collect()
}

/// Print tokens in the chosen format.
pub fn write_tokens(out: &mut impl Write, tokens: &[Token], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => {
            for token in tokens {
                writeln!(out, "{}", token)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, tokens)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Format one diagnostic for stderr.
pub fn format_diagnostic(diagnostic: &Diagnostic, name: &str, source: &str, settings: &Settings) -> String {
    if settings.fancy {
        render_fancy(diagnostic, name, source, settings.color)
    } else {
        diagnostic.to_string()
    }
}

/// Print every diagnostic of a scan.
pub fn write_diagnostics(
    err: &mut impl Write,
    result: &ScanResult,
    name: &str,
    source: &str,
    settings: &Settings,
) -> io::Result<()> {
    for diagnostic in &result.diagnostics {
        writeln!(err, "{}", format_diagnostic(diagnostic, name, source, settings))?;
    }
    Ok(())
}

/// Scan the given files and print the results. Returns the process exit code.
pub fn run_files(
    paths: &[PathBuf],
    settings: &Settings,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8, CliError> {
    let scanned = scan_files(paths, settings.options);
    let multiple = paths.len() > 1;
    let mut code = 0;
    let mut json_files = Vec::new();

    for entry in &scanned {
        let file = match entry {
            Ok(file) => file,
            Err(e) => {
                writeln!(err, "error: {}", e)?;
                code = code.max(e.exit_code());
                continue;
            }
        };

        let name = file.display_name();
        let with_file: Vec<Diagnostic> = file
            .result
            .diagnostics
            .diagnostics()
            .iter()
            .map(|d| d.clone().with_file(name.clone()))
            .collect();
        for diagnostic in &with_file {
            writeln!(err, "{}", format_diagnostic(diagnostic, &name, &file.source, settings))?;
        }
        if file.result.has_errors() {
            code = code.max(exit::DATA_ERR);
        }

        match settings.format {
            OutputFormat::Json if multiple => json_files.push(FileTokens {
                file: name,
                tokens: &file.result.tokens,
            }),
            format => {
                if multiple {
                    writeln!(out, "==> {} <==", name)?;
                }
                write_tokens(out, &file.result.tokens, format)?;
            }
        }
    }

    if !json_files.is_empty() {
        serde_json::to_writer_pretty(&mut *out, &json_files).map_err(io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(code)
}
