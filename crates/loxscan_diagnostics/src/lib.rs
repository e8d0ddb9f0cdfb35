//! loxscan_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Diagnostics carry the line they were reported on, the resolved message
//! text and, when the reporter knows it, the byte span of the offending
//! source. The scanner never decides what happens to a diagnostic; it hands
//! each one to a [`DiagnosticSink`] and keeps going.

pub mod render;

use loxscan_core::text::TextSpan;
use std::fmt;

pub use render::{render_fancy, LexReport};

/// A diagnostic message template with a code.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code, rendered as `LX{code}`.
    pub code: u32,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the diagnosed source came from, if any.
    pub file: Option<String>,
    /// The line the diagnostic was reported on.
    pub line: u32,
    /// The source text span where this diagnostic occurred, if known.
    pub span: Option<TextSpan>,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
}

impl Diagnostic {
    /// Create a new diagnostic for a line.
    pub fn new(message: &DiagnosticMessage, args: &[&str], line: u32) -> Self {
        Self {
            file: None,
            line,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
        }
    }

    /// Attach the source span of the offending text.
    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach the file the source came from.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this diagnostic was created from the given message template.
    pub fn is(&self, message: &DiagnosticMessage) -> bool {
        self.code == message.code
    }

    /// The code as displayed to users, e.g. `LX1001`.
    pub fn code_text(&self) -> String {
        format!("LX{}", self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}: ", file)?;
        }
        write!(f, "[line {}] Error: {}", self.line, self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Receiver for diagnostics produced during a scan.
///
/// Implemented by [`DiagnosticCollection`] and by any `FnMut(Diagnostic)`
/// closure, so callers can collect, print or count diagnostics as they
/// arrive.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(Diagnostic),
{
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// A collection of diagnostics accumulated during a scan.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Whether any diagnostic was recorded. Every lexical diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Number of diagnostics created from the given message template.
    pub fn count_of(&self, message: &DiagnosticMessage) -> usize {
        self.diagnostics.iter().filter(|d| d.is(message)).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Sort diagnostics by file, line and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then_with(|| {
                    let a_pos = a.span.map(|s| s.start).unwrap_or(0);
                    let b_pos = b.span.map(|s| s.start).unwrap_or(0);
                    a_pos.cmp(&b_pos)
                })
        });
    }
}

impl DiagnosticSink for DiagnosticCollection {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.add(diagnostic);
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $msg:expr) => {
            DiagnosticMessage { code: $code, message: $msg }
        };
    }

    // Scanner errors (1000-1099)
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1001, "Unexpected character '{0}'.");
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1002, "Unterminated string.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let msg = format_message("Unexpected character '{0}'.", &["@"]);
        assert_eq!(msg, "Unexpected character '@'.");
    }

    #[test]
    fn test_format_message_without_args() {
        assert_eq!(format_message("Unterminated string.", &[]), "Unterminated string.");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &["#"], 3);
        assert_eq!(diag.to_string(), "[line 3] Error: Unexpected character '#'.");

        let diag = diag.with_file("main.lox");
        assert_eq!(diag.to_string(), "main.lox: [line 3] Error: Unexpected character '#'.");
    }

    #[test]
    fn test_diagnostic_code() {
        let diag = Diagnostic::new(&messages::UNTERMINATED_STRING, &[], 1);
        assert_eq!(diag.code, 1002);
        assert_eq!(diag.code_text(), "LX1002");
        assert!(diag.is(&messages::UNTERMINATED_STRING));
        assert!(!diag.is(&messages::UNEXPECTED_CHARACTER));
        assert!(diag.span.is_none());
    }

    #[test]
    fn test_diagnostic_collection() {
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());
        assert!(!collection.has_errors());

        collection.add(Diagnostic::new(&messages::UNTERMINATED_STRING, &[], 1));
        collection.report(Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &["@"], 2));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 2);
        assert_eq!(collection.count_of(&messages::UNEXPECTED_CHARACTER), 1);
    }

    #[test]
    fn test_diagnostic_collection_sort() {
        let mut collection = DiagnosticCollection::new();
        collection.add(
            Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &["@"], 4)
                .with_span(TextSpan::new(30, 1)),
        );
        collection.add(
            Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &["#"], 4)
                .with_span(TextSpan::new(12, 1)),
        );
        collection.add(Diagnostic::new(&messages::UNTERMINATED_STRING, &[], 1));
        collection.sort();
        let lines: Vec<u32> = collection.diagnostics().iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 4, 4]);
        assert_eq!(collection.diagnostics()[1].span, Some(TextSpan::new(12, 1)));
    }

    #[test]
    fn test_closure_sink() {
        let mut lines = Vec::new();
        {
            let mut sink = |d: Diagnostic| lines.push(d.line);
            sink.report(Diagnostic::new(&messages::UNTERMINATED_STRING, &[], 7));
        }
        assert_eq!(lines, vec![7]);
    }
}
