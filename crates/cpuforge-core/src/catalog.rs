//! The component catalog.
//!
//! Every processor building block that can be placed on the canvas is one
//! variant of the closed [`ComponentType`] enumeration. Each type owns a
//! fixed, ordered list of [`Pin`]s; the table is built once on first use and
//! is read-only afterwards.
//!
//! Imported designs may reference type tags this version does not know.
//! Those are carried as [`ComponentKind::Unknown`] and resolve to an empty
//! pin list through [`pins_for`] instead of failing.

use std::{
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::OnceLock,
};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Point, Size};

/// Default width and height of a placed component.
pub const DEFAULT_COMPONENT_SIZE: Size = Size::new(100.0, 60.0);

/// Error returned when parsing a tag that names no [`ComponentType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component type `{0}`")]
pub struct UnknownComponentType(pub String);

/// Direction of a pin relative to its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    /// Returns the opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            PinDirection::Input => PinDirection::Output,
            PinDirection::Output => PinDirection::Input,
        }
    }
}

impl fmt::Display for PinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinDirection::Input => write!(f, "input"),
            PinDirection::Output => write!(f, "output"),
        }
    }
}

/// A named, directional attachment point on a component.
///
/// The offset is relative to the component's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    id: String,
    direction: PinDirection,
    label: String,
    offset: Point,
}

impl Pin {
    pub fn new(
        id: impl Into<String>,
        direction: PinDirection,
        label: impl Into<String>,
        offset: Point,
    ) -> Self {
        Self {
            id: id.into(),
            direction,
            label: label.into(),
            offset,
        }
    }

    /// Pin identifier, unique within its component.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn direction(&self) -> PinDirection {
        self.direction
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Anchor offset from the owning component's top-left corner.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }
}

/// Closed set of processor building blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    Alu,
    Register,
    Memory,
    ControlUnit,
    Cache,
    Decoder,
    Multiplexer,
    Bus,
    Clock,
    InputPort,
    OutputPort,
    Interrupt,
    Adder,
    Shifter,
    Comparator,
    ProgramCounter,
    InstructionRegister,
    FlagRegister,
    StackPointer,
}

type PinSpec = (&'static str, PinDirection, &'static str, f64, f64);

impl ComponentType {
    /// Every component type, in palette order.
    pub const ALL: [ComponentType; 19] = [
        ComponentType::Alu,
        ComponentType::Register,
        ComponentType::Memory,
        ComponentType::ControlUnit,
        ComponentType::Cache,
        ComponentType::Decoder,
        ComponentType::Multiplexer,
        ComponentType::Bus,
        ComponentType::Clock,
        ComponentType::InputPort,
        ComponentType::OutputPort,
        ComponentType::Interrupt,
        ComponentType::Adder,
        ComponentType::Shifter,
        ComponentType::Comparator,
        ComponentType::ProgramCounter,
        ComponentType::InstructionRegister,
        ComponentType::FlagRegister,
        ComponentType::StackPointer,
    ];

    /// Canonical tag used in design documents, e.g. `control-unit`.
    pub fn tag(self) -> &'static str {
        match self {
            ComponentType::Alu => "alu",
            ComponentType::Register => "register",
            ComponentType::Memory => "memory",
            ComponentType::ControlUnit => "control-unit",
            ComponentType::Cache => "cache",
            ComponentType::Decoder => "decoder",
            ComponentType::Multiplexer => "multiplexer",
            ComponentType::Bus => "bus",
            ComponentType::Clock => "clock",
            ComponentType::InputPort => "input-port",
            ComponentType::OutputPort => "output-port",
            ComponentType::Interrupt => "interrupt",
            ComponentType::Adder => "adder",
            ComponentType::Shifter => "shifter",
            ComponentType::Comparator => "comparator",
            ComponentType::ProgramCounter => "program-counter",
            ComponentType::InstructionRegister => "instruction-register",
            ComponentType::FlagRegister => "flag-register",
            ComponentType::StackPointer => "stack-pointer",
        }
    }

    /// Human readable name, e.g. `Control Unit`.
    pub fn display_name(self) -> &'static str {
        match self {
            ComponentType::Alu => "ALU",
            ComponentType::Register => "Register",
            ComponentType::Memory => "Memory",
            ComponentType::ControlUnit => "Control Unit",
            ComponentType::Cache => "Cache",
            ComponentType::Decoder => "Decoder",
            ComponentType::Multiplexer => "Multiplexer",
            ComponentType::Bus => "Bus",
            ComponentType::Clock => "Clock",
            ComponentType::InputPort => "Input Port",
            ComponentType::OutputPort => "Output Port",
            ComponentType::Interrupt => "Interrupt",
            ComponentType::Adder => "Adder",
            ComponentType::Shifter => "Shifter",
            ComponentType::Comparator => "Comparator",
            ComponentType::ProgramCounter => "Program Counter",
            ComponentType::InstructionRegister => "Instruction Register",
            ComponentType::FlagRegister => "Flag Register",
            ComponentType::StackPointer => "Stack Pointer",
        }
    }

    /// Icon glyph shown by the palette and on the canvas.
    pub fn icon(self) -> &'static str {
        match self {
            ComponentType::Alu => "🧮",
            ComponentType::Register => "📝",
            ComponentType::Memory => "💾",
            ComponentType::ControlUnit => "🎛️",
            ComponentType::Cache => "⚡",
            ComponentType::Decoder => "🔍",
            ComponentType::Multiplexer => "🔀",
            ComponentType::Bus => "🚌",
            ComponentType::Clock => "⏰",
            ComponentType::InputPort => "📥",
            ComponentType::OutputPort => "📤",
            ComponentType::Interrupt => "⚠️",
            ComponentType::Adder => "➕",
            ComponentType::Shifter => "↔️",
            ComponentType::Comparator => "⚖️",
            ComponentType::ProgramCounter => "📍",
            ComponentType::InstructionRegister => "📋",
            ComponentType::FlagRegister => "🏳️",
            ComponentType::StackPointer => "📚",
        }
    }

    /// Label given to freshly placed instances: the tag upper-cased with its
    /// first dash turned into a space (`CONTROL UNIT`, `INSTRUCTION REGISTER`).
    pub fn default_label(self) -> String {
        self.tag().to_uppercase().replacen('-', " ", 1)
    }

    /// Ordered pin list of this type.
    pub fn pins(self) -> &'static [Pin] {
        catalog()
            .get(&self)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn pin_specs(self) -> &'static [PinSpec] {
        use PinDirection::{Input as In, Output as Out};

        match self {
            ComponentType::Alu => &[
                ("in1", In, "A", 0.0, 20.0),
                ("in2", In, "B", 0.0, 40.0),
                ("out", Out, "Result", 100.0, 30.0),
            ],
            ComponentType::Register => &[
                ("in", In, "Data In", 0.0, 30.0),
                ("out", Out, "Data Out", 100.0, 30.0),
            ],
            ComponentType::Memory => &[
                ("addr", In, "Address", 0.0, 20.0),
                ("data_in", In, "Data In", 0.0, 40.0),
                ("data_out", Out, "Data Out", 100.0, 30.0),
            ],
            ComponentType::ControlUnit => &[
                ("instruction", In, "Instruction", 0.0, 30.0),
                ("control1", Out, "Control 1", 100.0, 20.0),
                ("control2", Out, "Control 2", 100.0, 40.0),
            ],
            ComponentType::Cache => &[
                ("cpu_in", In, "CPU Request", 0.0, 20.0),
                ("mem_in", In, "Memory Data", 0.0, 40.0),
                ("cpu_out", Out, "CPU Data", 100.0, 20.0),
                ("mem_out", Out, "Memory Request", 100.0, 40.0),
            ],
            ComponentType::Decoder => &[
                ("encoded_in", In, "Encoded", 0.0, 30.0),
                ("out1", Out, "Out 1", 100.0, 15.0),
                ("out2", Out, "Out 2", 100.0, 30.0),
                ("out3", Out, "Out 3", 100.0, 45.0),
            ],
            ComponentType::Multiplexer => &[
                ("in1", In, "In 1", 0.0, 15.0),
                ("in2", In, "In 2", 0.0, 30.0),
                ("in3", In, "In 3", 0.0, 45.0),
                ("select", In, "Select", 50.0, 0.0),
                ("out", Out, "Output", 100.0, 30.0),
            ],
            ComponentType::Bus => &[
                ("in1", In, "In", 0.0, 30.0),
                ("out1", Out, "Out 1", 100.0, 15.0),
                ("out2", Out, "Out 2", 100.0, 30.0),
                ("out3", Out, "Out 3", 100.0, 45.0),
            ],
            ComponentType::Clock => &[("clk_out", Out, "Clock", 100.0, 30.0)],
            ComponentType::InputPort => &[
                ("external", In, "External", 0.0, 30.0),
                ("internal", Out, "Internal", 100.0, 30.0),
            ],
            ComponentType::OutputPort => &[
                ("internal", In, "Internal", 0.0, 30.0),
                ("external", Out, "External", 100.0, 30.0),
            ],
            ComponentType::Interrupt => &[
                ("signal", In, "Signal", 0.0, 30.0),
                ("cpu_int", Out, "CPU Interrupt", 100.0, 30.0),
            ],
            ComponentType::Adder => &[
                ("in1", In, "A", 0.0, 20.0),
                ("in2", In, "B", 0.0, 40.0),
                ("out", Out, "Sum", 100.0, 30.0),
                ("carry", Out, "Carry", 100.0, 15.0),
            ],
            ComponentType::Shifter => &[
                ("data_in", In, "Data", 0.0, 20.0),
                ("shift_amt", In, "Shift Amount", 0.0, 40.0),
                ("direction", In, "Direction", 0.0, 45.0),
                ("data_out", Out, "Shifted Data", 100.0, 30.0),
            ],
            ComponentType::Comparator => &[
                ("in1", In, "A", 0.0, 20.0),
                ("in2", In, "B", 0.0, 40.0),
                ("equal", Out, "Equal", 100.0, 15.0),
                ("greater", Out, "Greater", 100.0, 30.0),
                ("less", Out, "Less", 100.0, 45.0),
            ],
            ComponentType::ProgramCounter => &[
                ("clk", In, "Clock", 0.0, 15.0),
                ("reset", In, "Reset", 0.0, 30.0),
                ("enable", In, "Enable", 0.0, 45.0),
                ("address", Out, "Address", 100.0, 30.0),
            ],
            ComponentType::InstructionRegister => &[
                ("instruction_in", In, "Instruction", 0.0, 20.0),
                ("clk", In, "Clock", 0.0, 40.0),
                ("opcode", Out, "Opcode", 100.0, 15.0),
                ("operand", Out, "Operand", 100.0, 30.0),
                ("address", Out, "Address", 100.0, 45.0),
            ],
            ComponentType::FlagRegister => &[
                ("flags_in", In, "Flags In", 0.0, 20.0),
                ("clk", In, "Clock", 0.0, 40.0),
                ("zero", Out, "Zero", 100.0, 10.0),
                ("carry", Out, "Carry", 100.0, 25.0),
                ("negative", Out, "Negative", 100.0, 40.0),
                ("overflow", Out, "Overflow", 100.0, 55.0),
            ],
            ComponentType::StackPointer => &[
                ("clk", In, "Clock", 0.0, 15.0),
                ("push", In, "Push", 0.0, 30.0),
                ("pop", In, "Pop", 0.0, 45.0),
                ("address", Out, "Stack Address", 100.0, 30.0),
            ],
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ComponentType {
    type Err = UnknownComponentType;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|ty| ty.tag() == tag)
            .ok_or_else(|| UnknownComponentType(tag.to_string()))
    }
}

/// Type of a placed component: a catalog type or a tag this build does not know.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Known(ComponentType),
    Unknown(String),
}

impl ComponentKind {
    /// Parses a tag, keeping unrecognised tags as [`ComponentKind::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        tag.parse()
            .map(ComponentKind::Known)
            .unwrap_or_else(|_| ComponentKind::Unknown(tag.to_string()))
    }

    pub fn tag(&self) -> &str {
        match self {
            ComponentKind::Known(ty) => ty.tag(),
            ComponentKind::Unknown(tag) => tag,
        }
    }

    pub fn known(&self) -> Option<ComponentType> {
        match self {
            ComponentKind::Known(ty) => Some(*ty),
            ComponentKind::Unknown(_) => None,
        }
    }

    pub fn is(&self, ty: ComponentType) -> bool {
        self.known() == Some(ty)
    }

    /// Label given to freshly placed instances of this kind.
    pub fn default_label(&self) -> String {
        match self {
            ComponentKind::Known(ty) => ty.default_label(),
            ComponentKind::Unknown(tag) => tag.to_uppercase().replacen('-', " ", 1),
        }
    }

    pub fn icon(&self) -> Option<&'static str> {
        self.known().map(ComponentType::icon)
    }
}

impl From<ComponentType> for ComponentKind {
    fn from(ty: ComponentType) -> Self {
        ComponentKind::Known(ty)
    }
}

impl From<&str> for ComponentKind {
    fn from(tag: &str) -> Self {
        ComponentKind::from_tag(tag)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ordered pin list for a component kind; empty for unknown kinds.
///
/// # Examples
///
/// ```
/// use cpuforge_core::catalog::{pins_for, ComponentKind, ComponentType};
///
/// let alu = pins_for(&ComponentKind::Known(ComponentType::Alu));
/// assert_eq!(alu.len(), 3);
///
/// assert!(pins_for(&ComponentKind::from_tag("quantum-core")).is_empty());
/// ```
pub fn pins_for(kind: &ComponentKind) -> &'static [Pin] {
    match kind {
        ComponentKind::Known(ty) => ty.pins(),
        ComponentKind::Unknown(_) => &[],
    }
}

static CATALOG: OnceLock<HashMap<ComponentType, Vec<Pin>>> = OnceLock::new();

fn catalog() -> &'static HashMap<ComponentType, Vec<Pin>> {
    CATALOG.get_or_init(|| {
        debug!(types = ComponentType::ALL.len(); "Building component catalog");
        ComponentType::ALL
            .into_iter()
            .map(|ty| {
                let pins = ty
                    .pin_specs()
                    .iter()
                    .map(|&(id, direction, label, x, y)| {
                        Pin::new(id, direction, label, Point::new(x, y))
                    })
                    .collect();
                (ty, pins)
            })
            .collect()
    })
}
