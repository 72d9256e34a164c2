//! Collector for accumulating diagnostics while an element is processed.

use log::debug;

use crate::error::{Diagnostic, Parsed};

/// Accumulates diagnostics instead of failing on the first problem.
///
/// # Example
///
/// ```
/// # use trellis_markup::error::{Diagnostic, DiagnosticCollector, Parsed};
/// let mut collector = DiagnosticCollector::new();
/// collector.emit(Diagnostic::warning("defaulted width"));
///
/// let inner = Parsed::new(7, vec![Diagnostic::error("missing target")]);
/// let value = collector.absorb(inner);
///
/// let parsed = collector.finish(value * 2);
/// assert_eq!(*parsed.value(), 14);
/// assert_eq!(parsed.diagnostics().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug!(diagnostic:% = diagnostic; "Diagnostic emitted");
        self.diagnostics.push(diagnostic);
    }

    /// Takes the diagnostics of a nested result and returns its value.
    pub fn absorb<T>(&mut self, parsed: Parsed<T>) -> T {
        let (value, diagnostics) = parsed.into_parts();
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
        value
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Finish collection, pairing the diagnostics with the best-effort value.
    pub fn finish<T>(self, value: T) -> Parsed<T> {
        Parsed::new(value, self.diagnostics)
    }
}
