//! loxscan: Tokenize Lox source files, or lines typed at a prompt.
//!
//! Usage:
//!   loxscan [options] [file...]
//!
//! With no files an interactive prompt is started.

mod driver;
mod error;
mod repl;

use clap::Parser as ClapParser;
use driver::Settings;
use error::{exit, CliError};
use loxscan_options::{load_config, LineBase, OutputFormat};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "loxscan", about = "Tokenizer for the Lox scripting language", disable_version_flag = true)]
struct Cli {
    /// Lox files to scan. Starts an interactive prompt when omitted.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Token output format: text or json.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Number of the first line: 0 or 1.
    #[arg(long = "line-base", value_name = "N")]
    line_base: Option<LineBase>,

    /// Path to a loxscan.json config file.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Print diagnostics as single lines, without source excerpts.
    #[arg(long)]
    plain: bool,

    /// Log progress to stderr.
    #[arg(long)]
    verbose: bool,

    /// Print the version.
    #[arg(short = 'v', long)]
    version: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { exit::USAGE as i32 } else { 0 });
        }
    };

    if cli.version {
        println!("loxscan {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(cli.verbose);

    let use_color = io::stderr().is_terminal();
    let code = match run(&cli, use_color) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e.to_string(), use_color);
            e.exit_code()
        }
    };
    process::exit(code as i32);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "loxscan=debug" } else { "loxscan=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_settings(cli: &Cli, use_color: bool) -> Result<Settings, CliError> {
    let cwd = std::env::current_dir().map_err(CliError::Output)?;
    let config = load_config(cli.config.as_deref(), &cwd)?;

    let mut options = config.scan_options();
    // Command-line flags override the config file.
    if let Some(line_base) = cli.line_base {
        options.line_base = line_base;
    }
    let settings = Settings {
        options,
        format: cli.format.unwrap_or(config.format),
        fancy: use_color && !cli.plain,
        color: use_color,
    };
    debug!(?settings, "resolved settings");
    Ok(settings)
}

fn run(cli: &Cli, use_color: bool) -> Result<u8, CliError> {
    let settings = resolve_settings(cli, use_color)?;

    if cli.files.is_empty() {
        repl::run(&settings)?;
        return Ok(0);
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    driver::run_files(&cli.files, &settings, &mut stdout.lock(), &mut stderr.lock())
}

fn print_error(msg: &str, use_color: bool) {
    if use_color {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}
