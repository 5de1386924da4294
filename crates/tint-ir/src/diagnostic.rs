//! Diagnostics collected while building, resolving and transforming programs.

use std::fmt;
use std::ops::Range;

use crate::source::Source;

/// How serious a [`Diagnostic`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// A single message with a severity and a source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub source: Source,
    pub message: String,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.source, self.severity, self.message)
    }
}

/// An ordered list of diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticList {
    entries: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.entries.push(diagnostic);
    }

    pub fn add_error(&mut self, message: impl Into<String>, source: Source) {
        self.add(Diagnostic {
            severity: Severity::Error,
            source,
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>, source: Source) {
        self.add(Diagnostic {
            severity: Severity::Warning,
            source,
            message: message.into(),
        });
    }

    /// Appends every diagnostic of `other`.
    pub fn extend(&mut self, other: &DiagnosticList) {
        for diagnostic in &other.entries {
            self.add(diagnostic.clone());
        }
    }

    pub fn contains_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Drops the diagnostics at positions `range`, clamped to the list.
    pub fn remove_range(&mut self, range: Range<usize>) {
        let end = range.end.min(self.entries.len());
        let start = range.start.min(end);
        self.entries.drain(start..end);
        self.error_count = self.entries.iter().filter(|d| d.is_error()).count();
    }

    /// Returns `true` if any diagnostic carries exactly `message`.
    pub fn contains_message(&self, message: &str) -> bool {
        self.entries.iter().any(|d| d.message == message)
    }
}

impl<'a> IntoIterator for &'a DiagnosticList {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for DiagnosticList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.entries {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_errors_only() {
        let mut list = DiagnosticList::new();
        list.add_warning("code is unreachable", Source::new(3, 5));
        assert!(!list.contains_errors());
        list.add_error("bad", Source::with_file("a.wgsl", 1, 2));
        list.add(Diagnostic {
            severity: Severity::Fatal,
            source: Source::default(),
            message: "boom".into(),
        });
        assert_eq!(list.error_count(), 2);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn display_includes_location() {
        let d = Diagnostic {
            severity: Severity::Error,
            source: Source::with_file("shader.wgsl", 12, 4),
            message: "v-0006: identifier must be declared before use: x".into(),
        };
        assert_eq!(
            d.to_string(),
            "shader.wgsl:12:4 error: v-0006: identifier must be declared before use: x"
        );
    }

    #[test]
    fn extend_keeps_counts() {
        let mut a = DiagnosticList::new();
        a.add_error("one", Source::default());
        let mut b = DiagnosticList::new();
        b.extend(&a);
        b.extend(&a);
        assert_eq!(b.error_count(), 2);
        assert!(b.contains_message("one"));
    }

    #[test]
    fn remove_range_recounts_errors() {
        let mut list = DiagnosticList::new();
        list.add_error("kept", Source::default());
        list.add_warning("dropped", Source::default());
        list.add_error("dropped too", Source::default());
        list.remove_range(1..7);
        assert_eq!(list.len(), 1);
        assert_eq!(list.error_count(), 1);
        assert!(list.contains_message("kept"));
    }
}
