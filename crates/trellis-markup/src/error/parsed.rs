//! A best-effort value paired with the diagnostics produced while making it.

use crate::error::Diagnostic;

/// The result of every core operation that can degrade.
///
/// `Parsed` always carries a usable value; problems are reported alongside it
/// so the caller can continue with the rest of the document and still assert
/// on what went wrong.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Parsed<T> {
    value: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// A value produced without any diagnostics.
    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }

    /// Returns true if no diagnostic was produced.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }

    /// Transforms the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed::new(f(self.value), self.diagnostics)
    }

    /// Appends one more diagnostic.
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }
}

impl<T: Default> Default for Parsed<T> {
    fn default() -> Self {
        Self::clean(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_and_map() {
        let parsed = Parsed::clean(2).map(|v| v * 10);
        assert_eq!(*parsed.value(), 20);
        assert!(parsed.is_clean());
    }

    #[test]
    fn test_with_diagnostic() {
        let parsed = Parsed::clean("x").with_diagnostic(Diagnostic::warning("w"));
        assert!(!parsed.is_clean());
        assert!(!parsed.has_errors());

        let parsed = parsed.with_diagnostic(Diagnostic::error("e"));
        assert!(parsed.has_errors());
        let (value, diagnostics) = parsed.into_parts();
        assert_eq!(value, "x");
        assert_eq!(diagnostics.len(), 2);
    }
}
