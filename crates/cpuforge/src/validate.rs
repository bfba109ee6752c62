//! Structural checks over a [`Diagram`].
//!
//! [`validate`] never fails: defects in the design are reported as
//! [`Finding`]s tagged with a [`Severity`], since an incomplete diagram is the
//! normal state while editing. Checks always run in the same order:
//!
//! 1. required components (ALU, memory, control unit, register)
//! 2. pin coverage
//! 3. clock presence
//! 4. cycle detection

use std::fmt;

use log::debug;
use serde::Serialize;

use cpuforge_core::catalog::{ComponentType, PinDirection};

use crate::{
    diagram::{Diagram, PinRef},
    graph::ComponentGraph,
};

/// Components every basic processor design should contain, in report order.
pub const REQUIRED_COMPONENTS: [ComponentType; 4] = [
    ComponentType::Alu,
    ComponentType::Memory,
    ComponentType::ControlUnit,
    ComponentType::Register,
];

/// Number of unconnected pins listed before the message is truncated.
const UNCONNECTED_LIST_LIMIT: usize = 5;

/// Outcome tag of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One line of a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    severity: Severity,
    title: String,
    message: String,
}

impl Finding {
    fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.title, self.message)
    }
}

/// Ordered findings produced by [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns `true` if any finding has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_error())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// Severities in report order.
    pub fn severities(&self) -> Vec<Severity> {
        self.findings.iter().map(Finding::severity).collect()
    }
}

impl IntoIterator for Report {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

/// Runs every check against `diagram`.
pub fn validate(diagram: &Diagram) -> Report {
    let mut findings = Vec::new();

    findings.push(check_required_components(diagram));
    findings.extend(check_pin_coverage(diagram));
    findings.extend(check_clock(diagram));
    findings.push(check_cycles(diagram));

    let report = Report { findings };
    debug!(
        findings = report.len(),
        errors = report.count(Severity::Error),
        warnings = report.count(Severity::Warning);
        "Diagram validated"
    );
    report
}

fn contains(diagram: &Diagram, ty: ComponentType) -> bool {
    diagram.components().any(|c| c.kind().is(ty))
}

fn check_required_components(diagram: &Diagram) -> Finding {
    let missing: Vec<&str> = REQUIRED_COMPONENTS
        .into_iter()
        .filter(|ty| !contains(diagram, *ty))
        .map(ComponentType::display_name)
        .collect();

    if missing.is_empty() {
        Finding::new(
            Severity::Success,
            "Complete Basic Architecture",
            "Design contains all essential processor components (ALU, Memory, Control Unit, Register).",
        )
    } else {
        Finding::new(
            Severity::Warning,
            "Incomplete Basic Architecture",
            format!("Missing components: {}", missing.join(", ")),
        )
    }
}

fn check_pin_coverage(diagram: &Diagram) -> Vec<Finding> {
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for component in diagram.components() {
        for pin in component.pins() {
            if diagram.is_pin_connected(&PinRef::new(component.id(), pin.id())) {
                continue;
            }
            let entry = format!("{} - {}", component.label(), pin.label());
            match pin.direction() {
                PinDirection::Input => inputs.push(entry),
                PinDirection::Output => outputs.push(entry),
            }
        }
    }

    if inputs.is_empty() && outputs.is_empty() {
        return vec![Finding::new(
            Severity::Success,
            "All Connections Complete",
            "All component inputs and outputs are properly connected.",
        )];
    }

    let mut findings = Vec::new();
    if !inputs.is_empty() {
        findings.push(Finding::new(
            Severity::Warning,
            "Unconnected Inputs",
            format!("Unconnected inputs: {}", truncated_list(&inputs)),
        ));
    }
    if !outputs.is_empty() {
        findings.push(Finding::new(
            Severity::Warning,
            "Unconnected Outputs",
            format!("Unconnected outputs: {}", truncated_list(&outputs)),
        ));
    }
    findings
}

fn truncated_list(entries: &[String]) -> String {
    let shown = entries[..entries.len().min(UNCONNECTED_LIST_LIMIT)].join(", ");
    if entries.len() > UNCONNECTED_LIST_LIMIT {
        format!("{shown}…")
    } else {
        shown
    }
}

fn check_clock(diagram: &Diagram) -> Option<Finding> {
    (!contains(diagram, ComponentType::Clock)).then(|| {
        Finding::new(
            Severity::Warning,
            "No Clock Component",
            "Consider adding a clock component for synchronous operation.",
        )
    })
}

fn check_cycles(diagram: &Diagram) -> Finding {
    if ComponentGraph::new(diagram).has_cycle() {
        Finding::new(
            Severity::Error,
            "Circular Dependencies Detected",
            "Design contains circular connections which may cause timing issues.",
        )
    } else {
        Finding::new(
            Severity::Success,
            "No Circular Dependencies",
            "Design is free of circular connection paths.",
        )
    }
}
