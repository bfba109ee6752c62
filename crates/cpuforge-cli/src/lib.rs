//! cpuforge CLI library
//!
//! This module contains the core CLI logic for the cpuforge processor design
//! tool: validating design files, generating placeholder artifacts, writing
//! bundled examples and describing console instructions.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::fs;

use log::{info, warn};

use cpuforge::{DesignError, generate, simulate, snapshot, validate::Report};

/// Result of a successful CLI run.
#[derive(Debug)]
pub enum Outcome {
    /// The command completed and found nothing fatal.
    Success,
    /// Validation ran and reported at least one error finding.
    ValidationFailed(Report),
}

/// Run the cpuforge CLI application
///
/// # Errors
///
/// Returns `DesignError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Design files that are not valid documents
pub fn run(args: &Args) -> Result<Outcome, DesignError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Validate { input } => {
            info!(input_path = input; "Validating design");
            let diagram = cpuforge::load_design(input, &app_config)?;
            let report = cpuforge::validate::validate(&diagram);

            for finding in &report {
                println!("{finding}");
            }

            if report.has_errors() {
                return Ok(Outcome::ValidationFailed(report));
            }
        }
        Command::Generate {
            input,
            target,
            output,
        } => {
            let target = target.unwrap_or(app_config.generate().default_target());
            info!(input_path = input, format:% = target; "Generating artifact");

            let diagram = cpuforge::load_design(input, &app_config)?;
            let artifact = generate::generate(&diagram, target, &snapshot::timestamp_now())?;

            match output {
                Some(path) => {
                    fs::write(path, artifact)?;
                    info!(output_file = path; "Artifact written");
                }
                None => println!("{artifact}"),
            }
        }
        Command::Example { name, output } => {
            info!(example:% = name, output_file = output; "Writing example design");
            let diagram = name.build()?;
            cpuforge::save_design(output, &diagram)?;
        }
        Command::Simulate { command } => {
            match simulate::run_line(&command.join(" "), snapshot::timestamp_now()) {
                Ok(entry) => {
                    println!("> {}", entry.input());
                    println!("{}", entry.result());
                }
                Err(err) => warn!(err:% = err; "Nothing to simulate"),
            }
        }
    }

    Ok(Outcome::Success)
}
