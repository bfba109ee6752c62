//! Placeholder artifact generation.
//!
//! Emits textual skeletons describing a diagram: a Verilog module, a VHDL
//! entity, a commented assembly program, or a JSON description with usage
//! statistics. None of these are synthesizable; they exist so a design can
//! be carried into other tools as a starting point.

use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cpuforge_core::catalog::ComponentType;

use crate::{
    diagram::Diagram,
    error::DesignError,
    snapshot::{ComponentRecord, ConnectionRecord, DesignDocument},
};

/// Error returned when parsing an unrecognised target name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target `{0}`, expected one of: verilog, vhdl, assembly, json")]
pub struct UnknownTarget(pub String);

/// Output format for [`generate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Verilog,
    Vhdl,
    Assembly,
    #[default]
    Json,
}

impl Target {
    pub const ALL: [Target; 4] = [Target::Verilog, Target::Vhdl, Target::Assembly, Target::Json];

    pub fn name(self) -> &'static str {
        match self {
            Target::Verilog => "verilog",
            Target::Vhdl => "vhdl",
            Target::Assembly => "assembly",
            Target::Json => "json",
        }
    }

    /// Conventional file extension for the generated artifact.
    pub fn extension(self) -> &'static str {
        match self {
            Target::Verilog => "v",
            Target::Vhdl => "vhd",
            Target::Assembly => "asm",
            Target::Json => "json",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.name() == s)
            .ok_or_else(|| UnknownTarget(s.to_string()))
    }
}

/// Renders `diagram` for `target`, stamping the output with `timestamp`.
///
/// # Errors
///
/// Returns [`DesignError::Serialize`] if the JSON description cannot be
/// serialized. The text targets never fail.
pub fn generate(diagram: &Diagram, target: Target, timestamp: &str) -> Result<String, DesignError> {
    let output = match target {
        Target::Verilog => verilog(diagram, timestamp),
        Target::Vhdl => vhdl(diagram, timestamp),
        Target::Assembly => assembly(diagram, timestamp),
        Target::Json => json(diagram, timestamp)?,
    };
    debug!(format:% = target, bytes = output.len(); "Artifact generated");
    Ok(output)
}

// =============================================================================
// Verilog
// =============================================================================

fn verilog(diagram: &Diagram, timestamp: &str) -> String {
    let mut out = format!(
        "// Generated Verilog HDL Code
// Processor Design Tool
// Generated on: {timestamp}

module processor_design (
    input wire clk,
    input wire reset,
    input wire [31:0] instruction,
    output wire [31:0] result
);

"
    );

    for component in diagram.components() {
        if let Some(stub) = component.kind().known().and_then(verilog_instance) {
            out.push_str(stub);
        }
    }

    out.push_str(
        "endmodule

// Component implementations would go here...
// This is a simplified example for demonstration.",
    );
    out
}

fn verilog_instance(ty: ComponentType) -> Option<&'static str> {
    match ty {
        ComponentType::Alu => Some(
            "    // ALU Component
    alu alu_inst (
        .clk(clk),
        .a(alu_input_a),
        .b(alu_input_b),
        .result(alu_output)
    );

",
        ),
        ComponentType::Register => Some(
            "    // Register Component
    register reg_inst (
        .clk(clk),
        .reset(reset),
        .data_in(reg_data_in),
        .data_out(reg_data_out)
    );

",
        ),
        ComponentType::Memory => Some(
            "    // Memory Component
    memory mem_inst (
        .clk(clk),
        .address(mem_address),
        .data_in(mem_data_in),
        .data_out(mem_data_out),
        .write_enable(mem_we)
    );

",
        ),
        ComponentType::ControlUnit
        | ComponentType::Cache
        | ComponentType::Decoder
        | ComponentType::Multiplexer
        | ComponentType::Bus
        | ComponentType::Clock
        | ComponentType::InputPort
        | ComponentType::OutputPort
        | ComponentType::Interrupt
        | ComponentType::Adder
        | ComponentType::Shifter
        | ComponentType::Comparator
        | ComponentType::ProgramCounter
        | ComponentType::InstructionRegister
        | ComponentType::FlagRegister
        | ComponentType::StackPointer => None,
    }
}

// =============================================================================
// VHDL
// =============================================================================

fn vhdl(diagram: &Diagram, timestamp: &str) -> String {
    let signals: Vec<String> = diagram
        .components()
        .map(|c| format!("-- {} component signals", c.label()))
        .collect();
    let instances: Vec<String> = diagram
        .components()
        .map(|c| format!("-- {}: entity work.{}", c.label(), c.kind().tag()))
        .collect();

    format!(
        "-- Generated VHDL Code
-- Processor Design Tool
-- Generated on: {timestamp}

library IEEE;
use IEEE.STD_LOGIC_1164.ALL;
use IEEE.NUMERIC_STD.ALL;

entity processor_design is
    Port (
        clk : in STD_LOGIC;
        reset : in STD_LOGIC;
        instruction : in STD_LOGIC_VECTOR (31 downto 0);
        result : out STD_LOGIC_VECTOR (31 downto 0)
    );
end processor_design;

architecture Behavioral of processor_design is
    -- Component declarations
    {}

begin
    -- Component instantiations
    {}

end Behavioral;

-- This is a simplified VHDL template.
-- Full implementation would require detailed component definitions.",
        signals.join("\n    "),
        instances.join("\n    "),
    )
}

// =============================================================================
// Assembly
// =============================================================================

fn assembly(diagram: &Diagram, timestamp: &str) -> String {
    let setup: Vec<String> = diagram
        .components()
        .map(|c| format!("    ; Setup {}", c.label()))
        .collect();
    let has = |ty: ComponentType| diagram.components().any(|c| c.kind().is(ty));
    let alu_note = if has(ComponentType::Alu) {
        "    ; ALU operations available"
    } else {
        ""
    };
    let memory_note = if has(ComponentType::Memory) {
        "    ; Memory operations available"
    } else {
        ""
    };

    format!(
        "; Generated Assembly Code
; Processor Design Tool
; Generated on: {timestamp}

.section .text
.global _start

_start:
    ; Initialize processor components
{}

    ; Main execution loop
main_loop:
    ; Fetch instruction
    load r0, instruction_memory

    ; Decode instruction
    decode r0

    ; Execute based on components available:
{alu_note}
{memory_note}

    ; Continue execution
    jmp main_loop

; This is a simplified assembly template
; based on your processor design components.",
        setup.join("\n"),
    )
}

// =============================================================================
// JSON
// =============================================================================

#[derive(Debug, Serialize)]
struct Metadata<'a> {
    title: &'static str,
    generator: &'static str,
    generated: &'a str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    total_components: usize,
    total_connections: usize,
    component_types: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Description<'a> {
    metadata: Metadata<'a>,
    components: Vec<ComponentRecord>,
    connections: Vec<ConnectionRecord>,
    statistics: Statistics,
}

fn json(diagram: &Diagram, timestamp: &str) -> Result<String, DesignError> {
    let mut component_types: Vec<String> = Vec::new();
    for component in diagram.components() {
        let tag = component.kind().tag();
        if !component_types.iter().any(|seen| seen == tag) {
            component_types.push(tag.to_string());
        }
    }

    let document = DesignDocument::from_diagram(diagram);
    let description = Description {
        metadata: Metadata {
            title: "Processor Design",
            generator: "Processor Design Tool",
            generated: timestamp,
            version: "1.0",
        },
        statistics: Statistics {
            total_components: diagram.component_count(),
            total_connections: diagram.connection_count(),
            component_types,
        },
        components: document.components,
        connections: document.connections,
    };

    serde_json::to_string_pretty(&description).map_err(DesignError::Serialize)
}
