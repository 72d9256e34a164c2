//! CLI logic for the Trellis GraphML renderer.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use trellis::{
    DocumentBuilder, TrellisError,
    config::{AppConfig, RenderConfig},
    diagnostics::Diagnostic,
};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Report {
    /// The input document text, for rendering diagnostic snippets.
    pub source: String,
    /// Diagnostics of parsing and rendering, in that order.
    pub diagnostics: Vec<Diagnostic>,
    /// False when `--strict` suppressed the output.
    pub written: bool,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }
}

/// Run the Trellis CLI application
///
/// Parses the input file, renders it and writes the SVG to the output file.
/// Element defects do not fail the run; they are returned in the
/// [`Report`]. With `--strict`, error diagnostics suppress the output.
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Input that is not well-formed GraphML
/// - Rendering errors
pub fn run(args: &Args) -> Result<Report, TrellisError> {
    info!(
        input_path:? = args.input,
        output_path:? = args.output;
        "Processing document"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(margin) = args.margin {
        app_config = AppConfig::new(RenderConfig::new(margin), app_config.style().clone());
    }
    let source = fs::read_to_string(&args.input)?;

    let builder = DocumentBuilder::new(app_config);
    let (document, mut diagnostics) = builder.parse(&source)?.into_parts();
    let (svg, render_diagnostics) = builder.render_svg(&document)?.into_parts();
    diagnostics.extend(render_diagnostics);

    let mut report = Report {
        source,
        diagnostics,
        written: false,
    };
    if args.strict && report.has_errors() {
        warn!(output_file:? = args.output; "Output not written in strict mode");
        return Ok(report);
    }

    fs::write(&args.output, svg)?;
    report.written = true;
    info!(output_file:? = args.output; "SVG exported successfully");

    Ok(report)
}
