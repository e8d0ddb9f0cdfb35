//! loxscan_scanner: Lexer for the Lox scripting language.
//!
//! Turns source text into a flat list of [`Token`]s for a downstream parser:
//! - Single- and two-character punctuation and operators
//! - String literals (multi-line, no escapes) and decimal number literals
//! - Identifiers, with reserved words resolved through a shared keyword table
//! - `//` line comments
//!
//! ```
//! use loxscan_scanner::{scan, TokenKind};
//!
//! let result = scan("print 1 + 2;");
//! assert!(!result.has_errors());
//! assert_eq!(result.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//! ```

mod char_codes;
mod scanner;
mod token;

pub use scanner::{scan, scan_tokens, scan_with_options, ScanResult, Scanner};
pub use token::{Literal, Token, TokenKind};

pub use loxscan_options::{LineBase, ScanOptions};
