//! Integration tests for the public design API.
//!
//! These tests drive the store, validator and codec together the way an
//! editor front end would.

use proptest::prelude::*;

use cpuforge::{
    DesignError,
    catalog::{ComponentKind, ComponentType, PinDirection, pins_for},
    diagram::{Diagram, PinRef},
    geometry::Point,
    identifier::Id,
    presets::Example,
    snapshot::{self, DesignDocument},
    validate::{Severity, validate},
};

fn place(diagram: &mut Diagram, ty: ComponentType, x: f64) -> Id {
    diagram.add_component(ty, Point::new(x, 100.0)).unwrap().id()
}

fn wire(diagram: &mut Diagram, from: (Id, &str), to: (Id, &str)) {
    diagram
        .add_connection(PinRef::new(from.0, from.1), PinRef::new(to.0, to.1))
        .expect("connection should be accepted");
}

#[test]
fn test_catalog_pins_are_well_formed() {
    for ty in ComponentType::ALL {
        let pins = ty.pins();
        assert!(!pins.is_empty(), "{ty} has no pins");

        let mut ids: Vec<&str> = pins.iter().map(|p| p.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), pins.len(), "{ty} has duplicate pin ids");
    }

    assert!(pins_for(&ComponentKind::from_tag("warp-drive")).is_empty());
}

#[test]
fn test_empty_diagram_reports_all_missing() {
    let report = validate(&Diagram::new());
    let first = &report.findings()[0];

    assert_eq!(first.severity(), Severity::Warning);
    assert_eq!(
        first.message(),
        "Missing components: ALU, Memory, Control Unit, Register"
    );
}

#[test]
fn test_fully_connected_core_without_clock() {
    let mut diagram = Diagram::new();
    let alu = place(&mut diagram, ComponentType::Alu, 100.0);
    let mem = place(&mut diagram, ComponentType::Memory, 300.0);
    let ctrl = place(&mut diagram, ComponentType::ControlUnit, 500.0);
    let reg = place(&mut diagram, ComponentType::Register, 700.0);

    wire(&mut diagram, (ctrl, "control1"), (alu, "in1"));
    wire(&mut diagram, (ctrl, "control2"), (mem, "addr"));
    wire(&mut diagram, (mem, "data_out"), (reg, "in"));
    wire(&mut diagram, (reg, "out"), (alu, "in2"));
    // Input-side starts still add edges ctrl -> alu and mem -> reg.
    wire(&mut diagram, (ctrl, "instruction"), (alu, "out"));
    wire(&mut diagram, (mem, "data_in"), (reg, "out"));

    let report = validate(&diagram);
    assert_eq!(
        report.severities(),
        vec![
            Severity::Success,
            Severity::Success,
            Severity::Warning,
            Severity::Success
        ]
    );
    assert_eq!(report.findings()[1].title(), "All Connections Complete");
    assert_eq!(report.findings()[2].title(), "No Clock Component");
}

#[test]
fn test_cycle_appears_with_back_edge() {
    let mut diagram = Diagram::new();
    let a = place(&mut diagram, ComponentType::Register, 0.0);
    let b = place(&mut diagram, ComponentType::Register, 200.0);
    let c = place(&mut diagram, ComponentType::Register, 400.0);
    wire(&mut diagram, (a, "out"), (b, "in"));
    wire(&mut diagram, (b, "out"), (c, "in"));

    let last = validate(&diagram).findings().last().cloned().unwrap();
    assert_eq!(last.severity(), Severity::Success);

    wire(&mut diagram, (c, "out"), (a, "in"));
    let report = validate(&diagram);
    let last = report.findings().last().unwrap();
    assert_eq!(last.severity(), Severity::Error);
    assert_eq!(last.title(), "Circular Dependencies Detected");
    assert!(report.has_errors());
}

#[test]
fn test_single_register_pin_coverage() {
    let mut diagram = Diagram::new();
    place(&mut diagram, ComponentType::Register, 0.0);

    let report = validate(&diagram);
    let warnings: Vec<_> = report
        .iter()
        .filter(|f| f.title().starts_with("Unconnected"))
        .collect();

    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].message(), "Unconnected inputs: REGISTER - Data In");
    assert_eq!(warnings[1].message(), "Unconnected outputs: REGISTER - Data Out");
}

#[test]
fn test_rejected_connections_leave_store_unchanged() {
    let mut diagram = Diagram::new();
    let a = place(&mut diagram, ComponentType::Alu, 0.0);
    let b = place(&mut diagram, ComponentType::Alu, 200.0);

    let same_component = diagram.add_connection(PinRef::new(a, "out"), PinRef::new(a, "in1")).map(|_| ());
    let same_direction = diagram.add_connection(PinRef::new(a, "out"), PinRef::new(b, "out")).map(|_| ());

    assert!(matches!(same_component, Err(DesignError::RejectedConnection(_))));
    assert!(matches!(same_direction, Err(DesignError::RejectedConnection(_))));
    assert_eq!(diagram.connection_count(), 0);
}

#[test]
fn test_round_trip_preserves_design() {
    let original = Example::PipelinedCpu.build().unwrap();
    let text = snapshot::encode(&original).to_json_pretty().unwrap();
    let restored = snapshot::from_json(&text).unwrap();

    let summary = |d: &Diagram| {
        d.components()
            .map(|c| (c.id(), c.kind().clone(), c.position(), c.label().to_string()))
            .collect::<Vec<_>>()
    };
    assert_eq!(summary(&original), summary(&restored));

    let endpoints = |d: &Diagram| {
        d.connections()
            .map(|c| (c.id(), c.start().clone(), c.end().clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(endpoints(&original), endpoints(&restored));
}

#[test]
fn test_document_requires_both_lists() {
    let err = DesignDocument::from_json(r#"{"components": [], "timestamp": "x"}"#).unwrap_err();
    assert!(matches!(err, DesignError::InvalidFormat(_)));
}

#[test]
fn test_pin_directions_match_catalog_after_decode() {
    let diagram = Example::Microcontroller.build().unwrap();
    let restored =
        snapshot::from_json(&DesignDocument::from_diagram(&diagram).to_json().unwrap()).unwrap();

    let bus = restored.component(Id::new("bus1")).unwrap();
    assert_eq!(bus.pin("in1").unwrap().direction(), PinDirection::Input);
    assert_eq!(bus.pin("out3").unwrap().direction(), PinDirection::Output);
}

// =============================================================================
// Property tests
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Connect(usize, usize),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ComponentType::ALL.len()).prop_map(Op::Add),
        (0..16usize, 0..16usize).prop_map(|(a, b)| Op::Connect(a, b)),
        (0..16usize).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn connections_never_dangle(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut diagram = Diagram::new();

        for op in ops {
            let ids: Vec<Id> = diagram.components().map(|c| c.id()).collect();
            match op {
                Op::Add(ty) => {
                    diagram.add_component(ComponentType::ALL[ty], Point::default()).unwrap();
                }
                Op::Connect(a, b) if !ids.is_empty() => {
                    let (a, b) = (ids[a % ids.len()], ids[b % ids.len()]);
                    let out = diagram.component(a).unwrap().pins().iter().find(|p| p.is_output()).map(|p| p.id().to_string());
                    let input = diagram.component(b).unwrap().pins().iter().find(|p| p.is_input()).map(|p| p.id().to_string());
                    if let (Some(out), Some(input)) = (out, input) {
                        let result = diagram.add_connection(PinRef::new(a, out), PinRef::new(b, input));
                        prop_assert_eq!(result.is_ok(), a != b);
                    }
                }
                Op::Remove(i) if !ids.is_empty() => {
                    diagram.remove_component(ids[i % ids.len()]).unwrap();
                }
                _ => {}
            }

            for conn in diagram.connections() {
                prop_assert!(diagram.resolve(conn.start()).is_some());
                prop_assert!(diagram.resolve(conn.end()).is_some());
                prop_assert!(conn.start().component() != conn.end().component());
            }
        }
    }
}
