//! Diagnostics for tolerated anomalies.
//!
//! Nothing in the element model aborts because one element is defective.
//! Every substitution is described by a [`Diagnostic`] and returned next to
//! the best-effort value in a [`Parsed`].
//!
//! # Example
//!
//! ```
//! # use trellis_markup::error::{Diagnostic, ErrorCode, Parsed};
//! # use trellis_markup::Span;
//! let parsed = Parsed::clean(Vec::<String>::new()).with_diagnostic(
//!     Diagnostic::error("hyperedge `h0` has no endpoints")
//!         .with_code(ErrorCode::E201)
//!         .with_span(Span::new(120..160), "declared here"),
//! );
//! assert!(parsed.value().is_empty());
//! assert_eq!(parsed.diagnostics()[0].code(), Some(ErrorCode::E201));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parsed;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parsed::Parsed;
pub use severity::Severity;
