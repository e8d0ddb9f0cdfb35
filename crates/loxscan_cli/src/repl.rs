//! Interactive mode: scan one line at a time.

use crate::driver::{write_diagnostics, write_tokens, Settings};
use crate::error::CliError;
use loxscan_scanner::scan_with_options;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use tracing::debug;

const PROMPT: &str = "lox> ";
const INPUT_NAME: &str = "<stdin>";

/// Dot-prefixed commands understood by the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
}

impl ReplCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            ".help" | ".h" | ".?" => Some(ReplCommand::Help),
            ".exit" | ".quit" | ".q" => Some(ReplCommand::Exit),
            _ => None,
        }
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Each line is scanned on its own and its tokens are printed.")?;
    writeln!(out, "  .help   show this message")?;
    writeln!(out, "  .exit   leave (Ctrl-D works too)")
}

/// Scan a single line and print its tokens and diagnostics.
///
/// Returns whether the line had lexical errors. Errors on one line do not
/// carry over to the next.
pub fn scan_line(
    line: &str,
    settings: &Settings,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let result = scan_with_options(line, settings.options);
    write_diagnostics(err, &result, INPUT_NAME, line, settings)?;
    write_tokens(out, &result.tokens, settings.format)?;
    out.flush()?;
    Ok(result.has_errors())
}

/// Run the prompt until end of input or `.exit`.
pub fn run(settings: &Settings) -> Result<(), CliError> {
    let mut editor = DefaultEditor::new()?;
    let stdout = io::stdout();
    let stderr = io::stderr();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                editor.add_history_entry(line.as_str())?;

                match ReplCommand::parse(&line) {
                    Some(ReplCommand::Exit) => break,
                    Some(ReplCommand::Help) => print_help(&mut stdout.lock())?,
                    None => {
                        let had_errors = scan_line(&line, settings, &mut stdout.lock(), &mut stderr.lock())?;
                        debug!(had_errors, "scanned line");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
