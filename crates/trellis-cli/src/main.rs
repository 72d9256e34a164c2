//! Trellis CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info, warn};

use trellis_cli::{
    Args,
    error_adapter::{Reportable, diagnostic_reportables, to_reportables},
};

fn render(reportables: &[Reportable<'_>]) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in reportables {
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, reportable)
            .expect("Writing to String buffer is infallible");

        if reportable.is_error() {
            error!("{writer}");
        } else {
            warn!("{writer}");
        }
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Trellis");
    debug!(args:?; "Parsed arguments");

    match trellis_cli::run(&args) {
        Ok(report) => {
            render(&diagnostic_reportables(&report.diagnostics, &report.source));
            if !report.written {
                error!(diagnostics = report.diagnostics.len(); "Errors reported in strict mode");
                process::exit(1);
            }
        }
        Err(err) => {
            render(&to_reportables(&err));
            process::exit(1);
        }
    }

    info!("Completed successfully");
}
