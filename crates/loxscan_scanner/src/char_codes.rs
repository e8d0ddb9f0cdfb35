//! Character constants and classes used by the scanner.
//!
//! Lox identifiers and numbers are ASCII-only; anything outside ASCII is
//! an unexpected character.

pub const NULL_CHARACTER: char = '\0';
pub const LINE_FEED: char = '\n';
pub const DOUBLE_QUOTE: char = '"';
pub const DOT: char = '.';
pub const SLASH: char = '/';
pub const EQUALS: char = '=';
pub const UNDERSCORE: char = '_';

/// Whitespace that is skipped without touching the line counter.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(ch, ' ' | '\r' | '\t')
}

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == UNDERSCORE
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == UNDERSCORE
}
