//! Instruction console.
//!
//! Interprets one-line commands such as `ADD R1, R2` or `LOAD 0x10` and
//! describes, in words, which processor block would handle them. Nothing is
//! executed; the console exists so a learner can relate mnemonics to the
//! components on the canvas.
//!
//! Input is trimmed, upper-cased and split on runs of commas and whitespace.
//! The first word selects the operation, the rest are operands. Missing
//! operands are shown as `?`.

use std::{fmt, str::FromStr};

use log::debug;
use thiserror::Error;

/// Placeholder printed for an operand the command did not supply.
const MISSING_OPERAND: &str = "?";

/// Error returned when parsing a command line with no words in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("empty command")]
pub struct EmptyCommand;

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        lhs: Option<String>,
        rhs: Option<String>,
    },
    Load {
        address: Option<String>,
    },
    Store {
        value: Option<String>,
        address: Option<String>,
    },
    Mov {
        source: Option<String>,
        destination: Option<String>,
    },
    Cache {
        operation: Option<String>,
        target: Option<String>,
    },
    Interrupt {
        vector: Option<String>,
    },
    /// Any other mnemonic, kept upper-cased.
    Unknown(String),
}

impl Command {
    /// Upper-cased mnemonic of the command.
    pub fn mnemonic(&self) -> &str {
        match self {
            Command::Add { .. } => "ADD",
            Command::Load { .. } => "LOAD",
            Command::Store { .. } => "STORE",
            Command::Mov { .. } => "MOV",
            Command::Cache { .. } => "CACHE",
            Command::Interrupt { .. } => "INT",
            Command::Unknown(mnemonic) => mnemonic,
        }
    }

    /// Human readable description of what the command would do.
    pub fn describe(&self) -> String {
        let show = |operand: &Option<String>| -> String {
            operand.as_deref().unwrap_or(MISSING_OPERAND).to_string()
        };

        match self {
            Command::Add { lhs, rhs } => {
                format!("Adding {} and {} → Result stored in ALU", show(lhs), show(rhs))
            }
            Command::Load { address } => {
                format!("Loading data from memory address {} → Register", show(address))
            }
            Command::Store { value, address } => {
                format!("Storing {} to memory address {}", show(value), show(address))
            }
            Command::Mov {
                source,
                destination,
            } => format!("Moving data from {} to {}", show(source), show(destination)),
            Command::Cache { operation, target } => format!(
                "Cache operation: {} → {}",
                show(operation),
                target.as_deref().unwrap_or("Hit/Miss check")
            ),
            Command::Interrupt { vector } => {
                format!("Interrupt {} triggered → Control Unit handling", show(vector))
            }
            Command::Unknown(mnemonic) => format!("Unknown command: {mnemonic}"),
        }
    }
}

impl FromStr for Command {
    type Err = EmptyCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().to_uppercase();
        let mut words = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(str::to_string);

        let mnemonic = words.next().ok_or(EmptyCommand)?;
        let mut next = || words.next();

        let command = match mnemonic.as_str() {
            "ADD" => Command::Add {
                lhs: next(),
                rhs: next(),
            },
            "LOAD" => Command::Load { address: next() },
            "STORE" => Command::Store {
                value: next(),
                address: next(),
            },
            "MOV" => Command::Mov {
                source: next(),
                destination: next(),
            },
            "CACHE" => Command::Cache {
                operation: next(),
                target: next(),
            },
            "INT" => Command::Interrupt { vector: next() },
            _ => Command::Unknown(mnemonic),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// One executed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    timestamp: String,
    input: String,
    result: String,
}

impl ConsoleEntry {
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The command as echoed back: trimmed and upper-cased.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> &str {
        &self.result
    }
}

/// Parses and describes `line`, stamping the entry with `timestamp`.
///
/// # Errors
///
/// Returns [`EmptyCommand`] when the line holds no words.
pub fn run_line(line: &str, timestamp: impl Into<String>) -> Result<ConsoleEntry, EmptyCommand> {
    let command: Command = line.parse()?;
    debug!(mnemonic = command.mnemonic(); "Console command");
    Ok(ConsoleEntry {
        timestamp: timestamp.into(),
        input: line.trim().to_uppercase(),
        result: command.describe(),
    })
}
