//! Source units and the diagnostics log.
//!
//! The lexer and parser never fail: problems are appended to a caller-owned
//! [`DiagnosticSink`] as range-keyed records, and the caller decides whether
//! any of them should fail the overall build.

use crate::token::Range;
use std::fmt;

/// A source unit: an identifying label plus its immutable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub label: String,
    pub contents: String,
}

impl Source {
    pub fn new(label: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            contents: contents.into(),
        }
    }

    /// The text covered by `range`.
    pub fn text(&self, range: Range) -> &str {
        &self.contents[range.as_std()]
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let before = &self.contents[..offset.min(self.contents.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single error or warning anchored to a source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver for diagnostics produced while tokenizing and parsing.
pub trait DiagnosticSink {
    fn add(&mut self, diagnostic: Diagnostic);

    fn add_range_error(&mut self, range: Range, message: String) {
        self.add(Diagnostic {
            range,
            severity: Severity::Error,
            message,
        });
    }

    fn add_range_warning(&mut self, range: Range, message: String) {
        self.add(Diagnostic {
            range,
            severity: Severity::Warning,
            message,
        });
    }
}

/// Returned by [`Log::check`] when at least one error was logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("aborting due to {count} previous error(s)")]
pub struct ErrorsEmitted {
    pub count: usize,
}

/// In-memory diagnostics sink that keeps records in emission order.
#[derive(Debug, Clone, Default)]
pub struct Log {
    diagnostics: Vec<Diagnostic>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Fail if any error-severity diagnostic was logged. Warnings never fail.
    pub fn check(&self) -> Result<(), ErrorsEmitted> {
        match self.error_count() {
            0 => Ok(()),
            count => Err(ErrorsEmitted { count }),
        }
    }

    /// Consume the log, returning every diagnostic.
    pub fn done(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for Log {
    fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
