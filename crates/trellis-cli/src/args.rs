//! Command-line arguments of the `trellis` binary.

use std::path::PathBuf;

use clap::Parser;

/// Render a GraphML (yEd) document to SVG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// GraphML document to render
    pub input: PathBuf,

    /// Where to write the SVG
    #[arg(short, long, default_value = "out.svg")]
    pub output: PathBuf,

    /// TOML configuration file; searched for when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Canvas margin in pixels, overriding `[render] margin`
    #[arg(long, value_name = "PX")]
    pub margin: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Skip writing the output if any element reports an error
    #[arg(long)]
    pub strict: bool,
}
