//! Error codes for the Trellis diagnostic system.
//!
//! Error codes are organized by concern:
//! - `E1xx` - Markup errors (attributes and sections)
//! - `E2xx` - Graph structure errors (endpoints, realizers)
//! - `E3xx` - Resource errors (embedded vector graphics)
//! - `E4xx` - Dialect registration errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Markup Errors (E1xx)
    // =========================================================================
    /// Malformed number.
    ///
    /// A numeric attribute could not be parsed; zero is used instead.
    E100,

    /// Missing required attribute.
    E101,

    /// Missing required section.
    ///
    /// A child element the kind cannot be drawn without (such as the
    /// `<y:Table>` of a table node) is absent.
    E102,

    /// Unknown enumerated value.
    ///
    /// A shape type, line type, font style or color was not recognized and a
    /// default was substituted.
    E103,

    /// Unknown element kind.
    ///
    /// The namespace is installed but has no constructor for the kind name.
    E104,

    // =========================================================================
    // Structure Errors (E2xx)
    // =========================================================================
    /// Edge endpoint missing.
    ///
    /// An edge lacks its `source` or `target` attribute.
    E200,

    /// Hyperedge without endpoints.
    E201,

    /// Unresolved endpoint reference.
    ///
    /// An edge refers to a node whose geometry is not known.
    E202,

    /// Active realizer out of range.
    E203,

    // =========================================================================
    // Resource Errors (E3xx)
    // =========================================================================
    /// Missing resource reference.
    E300,

    /// Unknown resource identifier.
    E301,

    /// Unparsable embedded fragment.
    E302,

    /// Fragment root not found.
    E303,

    // =========================================================================
    // Registry Errors (E4xx)
    // =========================================================================
    /// Namespace conflict.
    ///
    /// A different dialect is already active under the same identifier.
    E400,
}

impl ErrorCode {
    /// Returns a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "malformed number",
            ErrorCode::E101 => "missing required attribute",
            ErrorCode::E102 => "missing required section",
            ErrorCode::E103 => "unknown enumerated value",
            ErrorCode::E104 => "unknown element kind",
            ErrorCode::E200 => "edge endpoint missing",
            ErrorCode::E201 => "hyperedge without endpoints",
            ErrorCode::E202 => "unresolved endpoint reference",
            ErrorCode::E203 => "active realizer out of range",
            ErrorCode::E300 => "missing resource reference",
            ErrorCode::E301 => "unknown resource identifier",
            ErrorCode::E302 => "unparsable embedded fragment",
            ErrorCode::E303 => "fragment root not found",
            ErrorCode::E400 => "namespace conflict",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
