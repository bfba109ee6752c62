//! Command-line argument definitions for the cpuforge CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the action; configuration file
//! selection and logging verbosity apply to all of them.

use clap::{Parser, Subcommand};

use cpuforge::{generate::Target, presets::Example};

/// Command-line arguments for the cpuforge processor design tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a design for missing components, unconnected pins and cycles
    Validate {
        /// Path to the design JSON file
        input: String,
    },

    /// Generate a placeholder artifact from a design
    Generate {
        /// Path to the design JSON file
        input: String,

        /// Output format (verilog, vhdl, assembly, json)
        #[arg(short, long)]
        target: Option<Target>,

        /// Output file; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write a bundled example design
    Example {
        /// Example name (simple-8bit, risc-processor, pipelined-cpu, microcontroller)
        name: Example,

        /// Path of the design JSON file to write
        #[arg(short, long, default_value = "processor-design.json")]
        output: String,
    },

    /// Describe what an instruction such as `ADD R1, R2` would do
    Simulate {
        /// Instruction words (ADD, LOAD, STORE, MOV, CACHE, INT)
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        command: Vec<String>,
    },
}
