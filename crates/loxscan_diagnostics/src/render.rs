//! Graphical diagnostic rendering through `miette`.

use crate::{messages, Diagnostic};
use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use thiserror::Error;

/// A diagnostic bundled with the source it points into, ready for `miette`.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct LexReport {
    message: String,
    code: String,
    label: &'static str,
    span: Option<SourceSpan>,
    source_code: NamedSource<String>,
}

impl LexReport {
    pub fn new(diagnostic: &Diagnostic, file_name: &str, source: &str) -> Self {
        let span = diagnostic.span.map(|span| {
            // miette wants the span inside the source; clamp zero-width spans at EOF.
            let start = (span.start as usize).min(source.len());
            let len = (span.length as usize).min(source.len() - start);
            SourceSpan::from((start, len))
        });
        Self {
            message: format!("[line {}] {}", diagnostic.line, diagnostic.message_text),
            code: diagnostic.code_text(),
            label: label_for(diagnostic),
            span,
            source_code: NamedSource::new(file_name, source.to_string()),
        }
    }
}

fn label_for(diagnostic: &Diagnostic) -> &'static str {
    if diagnostic.is(&messages::UNTERMINATED_STRING) {
        "string starts here"
    } else {
        "unexpected character"
    }
}

impl miette::Diagnostic for LexReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.label.to_string()),
            span,
        ))))
    }
}

/// Render a diagnostic as a graphical report with the offending span underlined.
pub fn render_fancy(diagnostic: &Diagnostic, file_name: &str, source: &str, color: bool) -> String {
    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);
    let report = LexReport::new(diagnostic, file_name, source);
    let mut out = String::new();
    if handler.render_report(&mut out, &report).is_err() {
        // Fall back to the plain one-line form.
        return diagnostic.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxscan_core::TextSpan;
    use miette::Diagnostic as _;

    #[test]
    fn test_report_carries_code_and_label() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &["@"], 1)
            .with_span(TextSpan::new(4, 1));
        let report = LexReport::new(&diag, "input.lox", "var @ = 1;");
        assert_eq!(report.code().map(|c| c.to_string()).as_deref(), Some("LX1001"));
        let labels: Vec<LabeledSpan> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 4);
        assert_eq!(labels[0].len(), 1);
        assert_eq!(labels[0].label(), Some("unexpected character"));
    }

    #[test]
    fn test_report_without_span_has_no_labels() {
        let diag = Diagnostic::new(&messages::UNTERMINATED_STRING, &[], 2);
        let report = LexReport::new(&diag, "input.lox", "\"abc");
        assert!(report.labels().is_none());
    }

    #[test]
    fn test_span_clamped_to_source() {
        let diag = Diagnostic::new(&messages::UNTERMINATED_STRING, &[], 1)
            .with_span(TextSpan::new(2, 10));
        let report = LexReport::new(&diag, "input.lox", "\"abc");
        let labels: Vec<LabeledSpan> = report.labels().into_iter().flatten().collect();
        assert_eq!(labels[0].offset(), 2);
        assert_eq!(labels[0].len(), 2);
    }

    #[test]
    fn test_render_fancy_contains_message() {
        let diag = Diagnostic::new(&messages::UNEXPECTED_CHARACTER, &["@"], 1)
            .with_span(TextSpan::new(0, 1));
        let rendered = render_fancy(&diag, "input.lox", "@", false);
        assert!(rendered.contains("Unexpected character '@'."));
        assert!(rendered.contains("LX1001"));
    }
}
