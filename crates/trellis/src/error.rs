//! Error types for Trellis operations.
//!
//! Only whole-document failures are errors. Defects of single elements are
//! reported as [`Diagnostic`](trellis_markup::error::Diagnostic)s next to a
//! best-effort result.

use std::io;

use thiserror::Error;

use trellis_markup::MarkupError;

/// The main error type for Trellis operations.
///
/// The `Markup` variant keeps the source text so that callers can render
/// the error with a snippet of the offending document.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Markup { err: MarkupError, src: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for TrellisError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl TrellisError {
    /// Create a new `Markup` error with the associated source text.
    pub fn new_markup_error(err: MarkupError, src: impl Into<String>) -> Self {
        Self::Markup {
            err,
            src: src.into(),
        }
    }
}
