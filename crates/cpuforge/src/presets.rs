//! Bundled example designs.
//!
//! Each example is a static blueprint of components (id, type, optional
//! label override, top-left position) and connections (id, start pin, end
//! pin). Blueprints are replayed through the [`Diagram`] API, so a loaded
//! example satisfies the same invariants as a hand-built design.

use std::{fmt, str::FromStr};

use log::debug;
use thiserror::Error;

use cpuforge_core::{
    catalog::{ComponentType, DEFAULT_COMPONENT_SIZE},
    geometry::Point,
    identifier::Id,
};

use crate::{
    diagram::{ComponentInstance, Diagram, PinRef},
    error::DesignError,
};

use ComponentType::*;

type ComponentRow = (&'static str, ComponentType, Option<&'static str>, f64, f64);
type ConnectionRow = (&'static str, (&'static str, &'static str), (&'static str, &'static str));

struct Blueprint {
    components: &'static [ComponentRow],
    connections: &'static [ConnectionRow],
}

const SIMPLE_8BIT: Blueprint = Blueprint {
    components: &[
        ("alu1", Alu, None, 300.0, 200.0),
        ("reg1", Register, None, 150.0, 150.0),
        ("reg2", Register, None, 150.0, 250.0),
        ("mem1", Memory, None, 500.0, 200.0),
        ("ctrl1", ControlUnit, None, 300.0, 100.0),
        ("pc1", ProgramCounter, None, 150.0, 50.0),
        ("clk1", Clock, None, 50.0, 100.0),
    ],
    connections: &[
        ("conn1", ("reg1", "out"), ("alu1", "in1")),
        ("conn2", ("reg2", "out"), ("alu1", "in2")),
        ("conn3", ("alu1", "out"), ("mem1", "data_in")),
        ("conn4", ("ctrl1", "control1"), ("alu1", "in1")),
        ("conn5", ("clk1", "clk_out"), ("pc1", "clk")),
    ],
};

const RISC_PROCESSOR: Blueprint = Blueprint {
    components: &[
        ("alu1", Alu, None, 400.0, 300.0),
        ("reg1", Register, None, 200.0, 200.0),
        ("reg2", Register, None, 200.0, 300.0),
        ("reg3", Register, None, 200.0, 400.0),
        ("mem1", Memory, None, 600.0, 300.0),
        ("ctrl1", ControlUnit, None, 400.0, 100.0),
        ("pc1", ProgramCounter, None, 200.0, 50.0),
        ("ir1", InstructionRegister, None, 400.0, 50.0),
        ("mux1", Multiplexer, None, 300.0, 250.0),
        ("adder1", Adder, None, 500.0, 150.0),
    ],
    connections: &[
        ("conn1", ("reg1", "out"), ("mux1", "in1")),
        ("conn2", ("reg2", "out"), ("mux1", "in2")),
        ("conn3", ("mux1", "out"), ("alu1", "in1")),
        ("conn4", ("alu1", "out"), ("mem1", "data_in")),
    ],
};

const PIPELINED_CPU: Blueprint = Blueprint {
    components: &[
        ("pc1", ProgramCounter, None, 100.0, 100.0),
        ("imem1", Memory, Some("INSTRUCTION MEMORY"), 250.0, 100.0),
        ("ir1", InstructionRegister, None, 100.0, 200.0),
        ("dec1", Decoder, None, 250.0, 200.0),
        ("regfile", Register, Some("REGISTER FILE"), 400.0, 200.0),
        ("alu1", Alu, None, 100.0, 300.0),
        ("comp1", Comparator, None, 250.0, 300.0),
        ("dmem1", Memory, Some("DATA MEMORY"), 100.0, 400.0),
        ("cache1", Cache, None, 250.0, 400.0),
        ("mux1", Multiplexer, None, 400.0, 400.0),
        ("ctrl1", ControlUnit, None, 550.0, 250.0),
        ("clk1", Clock, None, 550.0, 100.0),
    ],
    connections: &[
        ("conn1", ("pc1", "address"), ("imem1", "addr")),
        ("conn2", ("imem1", "data_out"), ("ir1", "instruction_in")),
        ("conn3", ("ir1", "opcode"), ("dec1", "encoded_in")),
        ("conn4", ("regfile", "out"), ("alu1", "in1")),
    ],
};

const MICROCONTROLLER: Blueprint = Blueprint {
    components: &[
        ("cpu1", Alu, Some("CPU CORE"), 300.0, 200.0),
        ("mem1", Memory, Some("FLASH MEMORY"), 450.0, 200.0),
        ("ram1", Memory, Some("RAM"), 450.0, 300.0),
        ("in1", InputPort, Some("INPUT PORT A"), 150.0, 150.0),
        ("in2", InputPort, Some("INPUT PORT B"), 150.0, 250.0),
        ("out1", OutputPort, Some("OUTPUT PORT A"), 600.0, 150.0),
        ("out2", OutputPort, Some("OUTPUT PORT B"), 600.0, 250.0),
        ("ctrl1", ControlUnit, None, 300.0, 100.0),
        ("clk1", Clock, Some("OSCILLATOR"), 150.0, 50.0),
        ("int1", Interrupt, Some("INTERRUPT CONTROLLER"), 300.0, 350.0),
        ("bus1", Bus, Some("SYSTEM BUS"), 300.0, 300.0),
    ],
    connections: &[
        ("conn1", ("cpu1", "out"), ("bus1", "in1")),
        ("conn2", ("bus1", "out1"), ("mem1", "addr")),
        ("conn3", ("bus1", "out2"), ("ram1", "addr")),
        ("conn4", ("in1", "internal"), ("cpu1", "in1")),
        ("conn5", ("clk1", "clk_out"), ("ctrl1", "instruction")),
    ],
};

/// Error returned when parsing an unrecognised example name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown example `{0}`, expected one of: simple-8bit, risc-processor, pipelined-cpu, microcontroller")]
pub struct UnknownExample(pub String);

/// A bundled example design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Example {
    Simple8Bit,
    RiscProcessor,
    PipelinedCpu,
    Microcontroller,
}

impl Example {
    pub const ALL: [Example; 4] = [
        Example::Simple8Bit,
        Example::RiscProcessor,
        Example::PipelinedCpu,
        Example::Microcontroller,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Example::Simple8Bit => "simple-8bit",
            Example::RiscProcessor => "risc-processor",
            Example::PipelinedCpu => "pipelined-cpu",
            Example::Microcontroller => "microcontroller",
        }
    }

    fn blueprint(self) -> &'static Blueprint {
        match self {
            Example::Simple8Bit => &SIMPLE_8BIT,
            Example::RiscProcessor => &RISC_PROCESSOR,
            Example::PipelinedCpu => &PIPELINED_CPU,
            Example::Microcontroller => &MICROCONTROLLER,
        }
    }

    /// Builds the example into a new diagram.
    ///
    /// # Errors
    ///
    /// Propagates any store error raised while replaying the blueprint.
    pub fn build(self) -> Result<Diagram, DesignError> {
        let mut diagram = Diagram::new();
        self.populate(&mut diagram)?;
        Ok(diagram)
    }

    /// Adds the example's components and connections to `diagram`.
    ///
    /// Example components always use the default 100×60 size.
    pub fn populate(self, diagram: &mut Diagram) -> Result<(), DesignError> {
        let blueprint = self.blueprint();

        for &(id, ty, label, x, y) in blueprint.components {
            let mut instance = ComponentInstance::new(
                Id::new(id),
                ty.into(),
                Point::new(x, y),
                DEFAULT_COMPONENT_SIZE,
            );
            if let Some(label) = label {
                instance = instance.with_label(label);
            }
            diagram.insert_component(instance)?;
        }

        for &(id, (from, from_pin), (to, to_pin)) in blueprint.connections {
            diagram.insert_connection(
                Id::new(id),
                PinRef::new(Id::new(from), from_pin),
                PinRef::new(Id::new(to), to_pin),
            )?;
        }

        debug!(example = self.name(); "Example loaded");
        Ok(())
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Example {
    type Err = UnknownExample;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Example::ALL
            .into_iter()
            .find(|example| example.name() == s)
            .ok_or_else(|| UnknownExample(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Severity, validate};

    #[test]
    fn test_every_example_builds() {
        for example in Example::ALL {
            let diagram = example.build().unwrap();
            let blueprint = example.blueprint();

            assert_eq!(diagram.component_count(), blueprint.components.len(), "{example}");
            assert_eq!(diagram.connection_count(), blueprint.connections.len(), "{example}");
        }
    }

    #[test]
    fn test_simple_8bit_layout() {
        let diagram = Example::Simple8Bit.build().unwrap();
        let ctrl = diagram.component(Id::new("ctrl1")).unwrap();

        assert_eq!(ctrl.label(), "CONTROL UNIT");
        assert_eq!(ctrl.position(), Point::new(300.0, 100.0));
        assert_eq!(diagram.connections_of(Id::new("alu1")).count(), 4);
    }

    #[test]
    fn test_label_overrides() {
        let diagram = Example::Microcontroller.build().unwrap();

        assert_eq!(diagram.component(Id::new("cpu1")).unwrap().label(), "CPU CORE");
        assert_eq!(diagram.component(Id::new("ctrl1")).unwrap().label(), "CONTROL UNIT");
    }

    #[test]
    fn test_examples_are_acyclic_and_complete() {
        for example in Example::ALL {
            let report = validate(&example.build().unwrap());
            assert!(!report.has_errors(), "{example}");
        }

        let report = validate(&Example::Simple8Bit.build().unwrap());
        assert_eq!(report.findings()[0].severity(), Severity::Success);
    }

    #[test]
    fn test_parse_names() {
        for example in Example::ALL {
            assert_eq!(example.name().parse::<Example>(), Ok(example));
        }
        assert!("z80".parse::<Example>().is_err());
    }
}
