//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single tolerated anomaly: the element it
//! concerns, where in the markup it sits, and what was substituted.

use std::fmt;

use trellis_core::identifier::Id;

use crate::{
    error::{ErrorCode, Severity},
    span::Span,
};

/// A non-fatal problem found while reading or building an element.
///
/// # Example
///
/// ```text
/// error[E200]: edge `e3` has no `target`
///   --> diagram.graphml:41:5
///    |
/// 41 |     <edge id="e3" source="n0">
///    |     ^^^^^^^^^^^^^^^^^^^^^^^^^^ endpoint missing
///    |
///    = help: the edge is kept but cannot be drawn
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    element: Option<Id>,
    span: Option<Span>,
    label: Option<String>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use trellis_markup::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::error("hyperedge `h0` has no endpoints")
    ///     .with_code(ErrorCode::E201)
    ///     .with_help("add <endpoint node=\"...\"/> children");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The element the diagnostic concerns, if known.
    pub fn element(&self) -> Option<Id> {
        self.element
    }

    /// Location in the source markup, if known.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Short text shown next to the span.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_element(mut self, element: Id) -> Self {
        self.element = Some(element);
        self
    }

    /// Points the diagnostic at a markup location.
    pub fn with_span(mut self, span: Span, label: impl Into<String>) -> Self {
        self.span = Some(span);
        self.label = Some(label.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            element: None,
            span: None,
            label: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}
