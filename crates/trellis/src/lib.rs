//! Trellis - an extensible GraphML dialect model.
//!
//! GraphML documents carry vendor extensions (yEd's realizers, resources)
//! under their own XML namespaces. Trellis dispatches every element to the
//! kind a registered dialect provides for it, keeps the parsed elements as
//! an editable [`document::Document`], and renders them to SVG.

pub mod config;
pub mod dialect;
pub mod document;
pub mod element;
pub mod fragment;
pub mod layout;
pub mod registry;

mod error;
mod export;

pub use trellis_core::{color, draw, geometry, identifier};
pub use trellis_markup::{Span, error as diagnostics};

pub use error::TrellisError;
pub use export::{Error as ExportError, Exporter, svg::SvgBuilder};

use std::rc::Rc;

use log::{debug, info, trace};

use trellis_markup::error::Parsed;

use config::AppConfig;
use document::Document;
use registry::{Namespace, NamespaceRegistry};

/// Builder for parsing and rendering GraphML documents.
///
/// Owns the [`NamespaceRegistry`] used for dispatch, pre-populated with the
/// GraphML and yWorks dialects.
///
/// # Examples
///
/// ```rust,no_run
/// use trellis::{DocumentBuilder, config::AppConfig};
///
/// let source = std::fs::read_to_string("diagram.graphml").expect("Failed to read");
///
/// let builder = DocumentBuilder::new(AppConfig::default());
/// let document = builder.parse(&source).expect("Failed to parse");
/// for diagnostic in document.diagnostics() {
///     eprintln!("{diagnostic}");
/// }
///
/// let svg = builder.render_svg(document.value()).expect("Failed to render");
/// println!("{}", svg.value());
/// ```
pub struct DocumentBuilder {
    config: AppConfig,
    registry: NamespaceRegistry,
}

impl DocumentBuilder {
    /// Create a new document builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            registry: NamespaceRegistry::with_builtin_dialects(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.registry
    }

    /// Activates an additional dialect.
    ///
    /// A conflict with an active namespace of the same URI is reported as a
    /// diagnostic and leaves the incumbent in place unless `overwrite` is set.
    pub fn install_dialect(&mut self, namespace: &Rc<Namespace>, overwrite: bool) -> Parsed<bool> {
        info!(namespace:% = namespace.identifier(), overwrite = overwrite; "Installing dialect");
        self.registry.install(namespace, overwrite)
    }

    /// Parse GraphML source into a document.
    ///
    /// # Errors
    ///
    /// Returns `TrellisError::Markup` if the source is not well-formed XML or
    /// its root is not `<graphml>`. Everything else is a diagnostic.
    pub fn parse(&self, source: &str) -> Result<Parsed<Document>, TrellisError> {
        info!(namespaces = self.registry.len(); "Parsing document");

        let document = Document::parse(source, &self.registry)
            .map_err(|err| TrellisError::new_markup_error(err, source))?;

        debug!(
            elements = document.value().len(),
            diagnostics = document.diagnostics().len();
            "Document parsed"
        );
        trace!(document:? = document.value(); "Parsed document");

        Ok(document)
    }

    /// Render a document to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns `TrellisError::Export` if the configured style is invalid or
    /// the output cannot be serialized.
    pub fn render_svg(&self, document: &Document) -> Result<Parsed<String>, TrellisError> {
        info!(elements = document.len(); "Rendering document");

        let mut exporter = SvgBuilder::new().with_config(&self.config).build()?;
        let mut buffer = Vec::new();
        let diagnostics = exporter.export_document(document, &mut buffer)?;
        let svg = String::from_utf8(buffer)
            .map_err(|err| ExportError::Render(format!("output is not UTF-8: {err}")))?;

        info!(bytes = svg.len(), diagnostics = diagnostics.len(); "SVG rendered successfully");
        Ok(diagnostics
            .into_iter()
            .fold(Parsed::clean(svg), Parsed::with_diagnostic))
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
