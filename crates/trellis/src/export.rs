//! Export of assembled documents.
//!
//! ```text
//! GraphML source
//!     ↓ parse (registry dispatch)
//! Document
//!     ↓ export (this module)
//! SVG text
//! ```

pub mod svg;

use std::io;

use trellis_markup::error::Diagnostic;

use crate::document::Document;

/// Abstraction for document export backends.
pub trait Exporter {
    /// Writes `document` to `writer` in the backend's format.
    ///
    /// Returns the diagnostics produced while building element subtrees;
    /// elements that failed to build are left out of the output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    fn export_document<W: io::Write>(
        &mut self,
        document: &Document,
        writer: W,
    ) -> Result<Vec<Diagnostic>, Error>;
}

/// Errors that can occur during export.
///
/// Converted into [`TrellisError::Export`](crate::TrellisError::Export) at
/// the crate boundary.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
