//! The Lox scanner.
//!
//! Converts source text into a flat list of tokens in a single pass. Lexical
//! errors are handed to a [`DiagnosticSink`] and scanning carries on with the
//! next character, so a scan always produces a complete token list ending in
//! [`TokenKind::Eof`].

use crate::char_codes::*;
use crate::token::{Literal, Token, TokenKind};
use loxscan_core::text::{TextPos, TextSpan};
use loxscan_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticSink};
use loxscan_options::ScanOptions;
use memchr::{memchr, memchr_iter};
use tracing::{debug, trace};

/// Single-use cursor over one source text.
pub struct Scanner<'src> {
    /// The source text being scanned.
    source: &'src str,
    /// Start of the lexeme being scanned.
    start: usize,
    /// Next unread byte.
    current: usize,
    /// Current line number.
    line: u32,
    /// Tokens emitted so far.
    tokens: Vec<Token>,
    /// Number of diagnostics reported so far.
    reported: usize,
}

impl<'src> Scanner<'src> {
    /// Create a scanner with default options (first line is line 1).
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, ScanOptions::default())
    }

    pub fn with_options(source: &'src str, options: ScanOptions) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: options.line_base.first_line(),
            tokens: Vec::new(),
            reported: 0,
        }
    }

    /// Scan the whole source. Always ends with exactly one `Eof` token.
    pub fn scan_tokens<S>(mut self, sink: &mut S) -> Vec<Token>
    where
        S: DiagnosticSink + ?Sized,
    {
        while !self.is_at_end() {
            if let Some(token) = self.scan_token(sink) {
                trace!(kind = %token.kind, line = token.line, lexeme = %token.lexeme, "token");
                self.tokens.push(token);
            }
        }

        self.tokens
            .push(Token::eof(self.line, self.current as TextPos));

        debug!(
            tokens = self.tokens.len(),
            diagnostics = self.reported,
            lines = self.line,
            "scan complete"
        );
        self.tokens
    }

    /// Decode one lexeme starting at the cursor.
    ///
    /// Returns the emitted token, or `None` when the lexeme was whitespace, a
    /// comment, a newline, or an error that was reported to `sink`.
    pub fn scan_token<S>(&mut self, sink: &mut S) -> Option<Token>
    where
        S: DiagnosticSink + ?Sized,
    {
        self.start = self.current;
        if self.is_at_end() {
            return None;
        }

        let ch = self.advance();
        let kind = match ch {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            ';' => TokenKind::Semicolon,
            '*' => TokenKind::Star,
            '!' => self.either(EQUALS, TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.either(EQUALS, TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.either(EQUALS, TokenKind::LessEqual, TokenKind::Less),
            '>' => self.either(EQUALS, TokenKind::GreaterEqual, TokenKind::Greater),
            SLASH => {
                if self.match_char(SLASH) {
                    self.skip_line_comment();
                    return None;
                }
                TokenKind::Slash
            }
            LINE_FEED => {
                self.line += 1;
                return None;
            }
            DOUBLE_QUOTE => return self.scan_string(sink),
            c if is_white_space_single_line(c) => return None,
            c if is_digit(c) => return Some(self.scan_number()),
            c if is_identifier_start(c) => return Some(self.scan_identifier()),
            c => {
                let shown = c.escape_debug().to_string();
                self.report(
                    sink,
                    Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &[&shown], self.line)
                        .with_span(self.lexeme_span()),
                );
                return None;
            }
        };

        Some(self.make_token(kind, None))
    }

    /// Whether the cursor has reached the end of the source.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// The current line number.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Byte offset of the next unread character.
    #[inline]
    pub fn position(&self) -> usize {
        self.current
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Consume one character and return it.
    #[inline]
    fn advance(&mut self) -> char {
        match self.source[self.current..].chars().next() {
            Some(ch) => {
                self.current += ch.len_utf8();
                ch
            }
            None => NULL_CHARACTER,
        }
    }

    /// Look at the next unread character without consuming it.
    #[inline]
    fn peek(&self) -> char {
        self.source[self.current..]
            .chars()
            .next()
            .unwrap_or(NULL_CHARACTER)
    }

    /// Look one character past [`Self::peek`].
    #[inline]
    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or(NULL_CHARACTER)
    }

    /// Consume the next character only if it is `expected`.
    #[inline]
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected || self.is_at_end() {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    /// Pick the two-character kind when `second` follows, else the one-character kind.
    #[inline]
    fn either(&mut self, second: char, matched: TokenKind, single: TokenKind) -> TokenKind {
        if self.match_char(second) {
            matched
        } else {
            single
        }
    }

    #[inline]
    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    #[inline]
    fn lexeme_span(&self) -> TextSpan {
        TextSpan::from_offsets(self.start, self.current)
    }

    fn make_token(&self, kind: TokenKind, literal: Option<Literal>) -> Token {
        Token::new(kind, self.lexeme(), literal, self.line, self.lexeme_span())
    }

    fn report<S>(&mut self, sink: &mut S, diagnostic: Diagnostic)
    where
        S: DiagnosticSink + ?Sized,
    {
        self.reported += 1;
        sink.report(diagnostic);
    }

    /// Number of `\n` bytes in `start..end`.
    fn count_newlines(&self, start: usize, end: usize) -> u32 {
        memchr_iter(b'\n', &self.source.as_bytes()[start..end]).count() as u32
    }

    // ========================================================================
    // Lexeme-specific scanning
    // ========================================================================

    /// Skip to the end of the line; the newline itself is left for the next step.
    fn skip_line_comment(&mut self) {
        let rest = &self.source.as_bytes()[self.current..];
        self.current = match memchr(b'\n', rest) {
            Some(offset) => self.current + offset,
            None => self.source.len(),
        };
    }

    /// Scan a string literal; the opening quote is already consumed.
    fn scan_string<S>(&mut self, sink: &mut S) -> Option<Token>
    where
        S: DiagnosticSink + ?Sized,
    {
        let body_start = self.current;
        match memchr(b'"', &self.source.as_bytes()[body_start..]) {
            Some(offset) => {
                let close = body_start + offset;
                self.line += self.count_newlines(body_start, close);
                self.current = close + 1;
                let value = self.source[body_start..close].to_string();
                Some(self.make_token(TokenKind::String, Some(Literal::String(value))))
            }
            None => {
                self.line += self.count_newlines(body_start, self.source.len());
                self.current = self.source.len();
                self.report(
                    sink,
                    Diagnostic::new(&messages::UNTERMINATED_STRING, &[], self.line)
                        .with_span(self.lexeme_span()),
                );
                None
            }
        }
    }

    /// Scan a number literal; the first digit is already consumed.
    fn scan_number(&mut self) -> Token {
        self.scan_digits();

        // A fractional part needs at least one digit after the dot.
        if self.peek() == DOT && is_digit(self.peek_next()) {
            self.advance();
            self.scan_digits();
        }

        // Digit runs with an optional fraction always parse.
        let value = self.lexeme().parse::<f64>().unwrap_or(f64::NAN);
        self.make_token(TokenKind::Number, Some(Literal::Number(value)))
    }

    fn scan_digits(&mut self) {
        while is_digit(self.peek()) {
            self.advance();
        }
    }

    /// Scan an identifier or keyword; the first character is already consumed.
    fn scan_identifier(&mut self) -> Token {
        while is_identifier_part(self.peek()) {
            self.advance();
        }

        let kind = TokenKind::from_keyword(self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, None)
    }
}

/// The tokens of one scan together with every diagnostic it reported.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub diagnostics: DiagnosticCollection,
}

impl ScanResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Token kinds in order, including the trailing `Eof`.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

/// Scan `source`, reporting diagnostics to `sink`.
pub fn scan_tokens<S>(source: &str, sink: &mut S) -> Vec<Token>
where
    S: DiagnosticSink + ?Sized,
{
    Scanner::new(source).scan_tokens(sink)
}

/// Scan `source` with default options, collecting diagnostics.
pub fn scan(source: &str) -> ScanResult {
    scan_with_options(source, ScanOptions::default())
}

/// Scan `source`, collecting diagnostics.
pub fn scan_with_options(source: &str, options: ScanOptions) -> ScanResult {
    let mut diagnostics = DiagnosticCollection::new();
    let tokens = Scanner::with_options(source, options).scan_tokens(&mut diagnostics);
    ScanResult {
        tokens,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxscan_options::LineBase;

    fn step(scanner: &mut Scanner<'_>) -> (Option<TokenKind>, usize) {
        let mut diagnostics = DiagnosticCollection::new();
        let kind = scanner.scan_token(&mut diagnostics).map(|t| t.kind);
        (kind, diagnostics.len())
    }

    #[test]
    fn test_step_single_char() {
        let mut scanner = Scanner::new("(");
        assert_eq!(step(&mut scanner), (Some(TokenKind::LeftParen), 0));
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_step_two_char_operator() {
        let mut scanner = Scanner::new("<=<");
        assert_eq!(step(&mut scanner), (Some(TokenKind::LessEqual), 0));
        assert_eq!(scanner.position(), 2);
        assert_eq!(step(&mut scanner), (Some(TokenKind::Less), 0));
    }

    #[test]
    fn test_step_whitespace_is_skipped() {
        let mut scanner = Scanner::new(" \tx");
        assert_eq!(step(&mut scanner), (None, 0));
        assert_eq!(step(&mut scanner), (None, 0));
        assert_eq!(step(&mut scanner), (Some(TokenKind::Identifier), 0));
    }

    #[test]
    fn test_step_newline_bumps_line() {
        let mut scanner = Scanner::new("\n\n");
        assert_eq!(scanner.line(), 1);
        assert_eq!(step(&mut scanner), (None, 0));
        assert_eq!(scanner.line(), 2);
    }

    #[test]
    fn test_step_comment_stops_before_newline() {
        let mut scanner = Scanner::new("// note\n+");
        assert_eq!(step(&mut scanner), (None, 0));
        assert_eq!(scanner.position(), 7);
        assert_eq!(scanner.line(), 1);
        assert_eq!(step(&mut scanner), (None, 0));
        assert_eq!(scanner.line(), 2);
        assert_eq!(step(&mut scanner), (Some(TokenKind::Plus), 0));
    }

    #[test]
    fn test_step_unexpected_character() {
        let mut scanner = Scanner::new("#+");
        assert_eq!(step(&mut scanner), (None, 1));
        assert_eq!(step(&mut scanner), (Some(TokenKind::Plus), 0));
    }

    #[test]
    fn test_step_non_ascii_consumed_whole() {
        let mut scanner = Scanner::new("é");
        assert_eq!(step(&mut scanner), (None, 1));
        assert!(scanner.is_at_end());
        assert_eq!(scanner.position(), 2);
    }

    #[test]
    fn test_step_at_end_is_noop() {
        let mut scanner = Scanner::new("");
        assert_eq!(step(&mut scanner), (None, 0));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_unterminated_string_leaves_cursor_at_end() {
        let mut scanner = Scanner::new("\"ab\ncd");
        assert_eq!(step(&mut scanner), (None, 1));
        assert!(scanner.is_at_end());
        assert_eq!(scanner.line(), 2);
    }

    #[test]
    fn test_zero_line_base() {
        let result = scan_with_options("a\nb", ScanOptions::with_line_base(LineBase::Zero));
        let lines: Vec<u32> = result.tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![0, 1, 1]);
    }

    #[test]
    fn test_spans() {
        let result = scan("var x = \"hi\";");
        let spans: Vec<(u32, u32)> = result
            .tokens
            .iter()
            .map(|t| (t.span.start, t.span.end()))
            .collect();
        assert_eq!(spans, vec![(0, 3), (4, 5), (6, 7), (8, 12), (12, 13), (13, 13)]);
    }

    #[test]
    fn test_diagnostic_spans() {
        let result = scan("1 @ \"open");
        let spans: Vec<Option<TextSpan>> =
            result.diagnostics.diagnostics().iter().map(|d| d.span).collect();
        assert_eq!(
            spans,
            vec![Some(TextSpan::from_bounds(2, 3)), Some(TextSpan::from_bounds(4, 9))]
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut messages = Vec::new();
        let tokens = scan_tokens("@ $", &mut |d: Diagnostic| messages.push(d.message_text));
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            messages,
            vec!["Unexpected character '@'.", "Unexpected character '$'."]
        );
    }

    #[test]
    fn test_dyn_sink() {
        let mut collection = DiagnosticCollection::new();
        let sink: &mut dyn DiagnosticSink = &mut collection;
        let tokens = scan_tokens("\"", sink);
        assert_eq!(tokens.len(), 1);
        assert_eq!(collection.count_of(&messages::UNTERMINATED_STRING), 1);
    }
}
