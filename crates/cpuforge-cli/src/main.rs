//! cpuforge CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use cpuforge_cli::{
    Args, Outcome,
    error_adapter::{Reportable, error_findings, to_reportables},
};

fn render(reportables: &[Reportable<'_>]) {
    let reporter = miette::GraphicalReportHandler::new();

    for reportable in reportables {
        let mut writer = String::new();
        reporter
            .render_report(&mut writer, reportable)
            .expect("Writing to String buffer is infallible");

        error!("{writer}");
    }
}

fn main() {
    // Install miette's pretty panic hook early for better panic reports
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

    info!(log_level:?; "Starting cpuforge");
    debug!(args:?; "Parsed arguments");

    match cpuforge_cli::run(&args) {
        Ok(Outcome::Success) => info!("Completed successfully"),
        Ok(Outcome::ValidationFailed(report)) => {
            render(&error_findings(&report));
            process::exit(1);
        }
        Err(err) => {
            render(&to_reportables(&err));
            process::exit(1);
        }
    }
}
