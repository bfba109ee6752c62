//! Snapshot codec: the JSON document used for export, import and session
//! persistence.
//!
//! The exported shape is
//!
//! ```json
//! {
//!   "components": [{ "id": "...", "type": "alu", "label": "ALU",
//!                    "position": { "x": 0, "y": 0 },
//!                    "dimensions": { "width": 100, "height": 60 },
//!                    "connectionPoints": [...] }],
//!   "connections": [{ "id": "...",
//!                     "from": { "component": "...", "point": "out" },
//!                     "to":   { "component": "...", "point": "in1" } }],
//!   "timestamp": "2024-01-01T00:00:00.000Z"
//! }
//! ```
//!
//! Import is lenient about everything but the two top-level lists: ids may be
//! numbers, positions and sizes may be flat `x`/`y`/`width`/`height` fields,
//! endpoints may be named `start`/`end` and may embed whole objects that carry
//! an `id`. Records that would break a [`Diagram`] invariant are dropped with
//! a warning instead of failing the whole import.

use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use cpuforge_core::{
    catalog::{ComponentKind, DEFAULT_COMPONENT_SIZE, Pin, PinDirection},
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    diagram::{ComponentInstance, Diagram, PinRef},
    error::DesignError,
};

/// Length of ids generated for imported components that have none.
const FALLBACK_ID_LEN: usize = 9;

// =============================================================================
// Document records
// =============================================================================

/// An id as found in a document: a string, or a number written by older tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    /// Returns `true` for ids that name nothing: `""` or the number `0`.
    pub fn is_blank(&self) -> bool {
        match self {
            RawId::Text(text) => text.is_empty(),
            RawId::Number(number) => number.as_f64() == Some(0.0),
        }
    }

    pub fn to_id(&self) -> Id {
        match self {
            RawId::Text(text) => Id::new(text),
            RawId::Number(number) => Id::new(&number.to_string()),
        }
    }
}

impl From<Id> for RawId {
    fn from(id: Id) -> Self {
        RawId::Text(id.to_string())
    }
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Text(text) => f.write_str(text),
            RawId::Number(number) => write!(f, "{number}"),
        }
    }
}

/// A reference to a component or pin: a bare id or an object carrying one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementRef {
    Id(RawId),
    Object { id: RawId },
}

impl ElementRef {
    pub fn raw_id(&self) -> &RawId {
        match self {
            ElementRef::Id(id) | ElementRef::Object { id } => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionsRecord {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinRecord {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(rename = "type")]
    pub direction: PinDirection,
    #[serde(default)]
    pub label: String,
}

impl From<&Pin> for PinRecord {
    fn from(pin: &Pin) -> Self {
        Self {
            id: pin.id().to_string(),
            x: pin.offset().x(),
            y: pin.offset().y(),
            direction: pin.direction(),
            label: pin.label().to_string(),
        }
    }
}

impl From<&PinRecord> for Pin {
    fn from(record: &PinRecord) -> Self {
        Pin::new(
            record.id.as_str(),
            record.direction,
            record.label.as_str(),
            Point::new(record.x, record.y),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<DimensionsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_points: Option<Vec<PinRecord>>,

    // Flat geometry written by older tools.
    #[serde(default, skip_serializing)]
    pub x: Option<f64>,
    #[serde(default, skip_serializing)]
    pub y: Option<f64>,
    #[serde(default, skip_serializing)]
    pub width: Option<f64>,
    #[serde(default, skip_serializing)]
    pub height: Option<f64>,
}

impl ComponentRecord {
    fn position(&self) -> Point {
        match self.position {
            Some(PositionRecord { x, y }) => Point::new(x, y),
            None => Point::new(self.x.unwrap_or_default(), self.y.unwrap_or_default()),
        }
    }

    fn size(&self, fallback: Size) -> Size {
        match self.dimensions {
            Some(DimensionsRecord { width, height }) => Size::new(width, height),
            None => Size::new(
                self.width.unwrap_or(fallback.width()),
                self.height.unwrap_or(fallback.height()),
            ),
        }
    }
}

impl From<&ComponentInstance> for ComponentRecord {
    fn from(component: &ComponentInstance) -> Self {
        let position = component.position();
        let size = component.size();
        Self {
            id: Some(component.id().into()),
            kind: component.kind().tag().to_string(),
            label: Some(component.label().to_string()),
            position: Some(PositionRecord {
                x: position.x(),
                y: position.y(),
            }),
            dimensions: Some(DimensionsRecord {
                width: size.width(),
                height: size.height(),
            }),
            connection_points: Some(component.pins().iter().map(PinRecord::from).collect()),
            x: None,
            y: None,
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub component: ElementRef,
    pub point: ElementRef,
}

impl EndpointRecord {
    fn to_pin_ref(&self) -> PinRef {
        PinRef::new(
            self.component.raw_id().to_id(),
            self.point.raw_id().to_string(),
        )
    }
}

impl From<&PinRef> for EndpointRecord {
    fn from(pin: &PinRef) -> Self {
        Self {
            component: ElementRef::Id(pin.component().into()),
            point: ElementRef::Id(RawId::Text(pin.pin().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RawId>,
    #[serde(alias = "start")]
    pub from: EndpointRecord,
    #[serde(alias = "end")]
    pub to: EndpointRecord,
}

/// The whole exported design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    pub components: Vec<ComponentRecord>,
    pub connections: Vec<ConnectionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl DesignDocument {
    /// Captures the diagram without a timestamp, as used for session saves.
    pub fn from_diagram(diagram: &Diagram) -> Self {
        Self {
            components: diagram.components().map(ComponentRecord::from).collect(),
            connections: diagram
                .connections()
                .map(|connection| ConnectionRecord {
                    id: Some(connection.id().into()),
                    from: connection.start().into(),
                    to: connection.end().into(),
                })
                .collect(),
            timestamp: None,
        }
    }

    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidFormat`] if the text is not JSON or the
    /// `components` or `connections` list is missing.
    pub fn from_json(text: &str) -> Result<Self, DesignError> {
        serde_json::from_str(text).map_err(|err| DesignError::InvalidFormat(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DesignError> {
        serde_json::to_string(self).map_err(DesignError::Serialize)
    }

    pub fn to_json_pretty(&self) -> Result<String, DesignError> {
        serde_json::to_string_pretty(self).map_err(DesignError::Serialize)
    }
}

// =============================================================================
// Codec
// =============================================================================

/// Captures the diagram with the current time as its timestamp.
pub fn encode(diagram: &Diagram) -> DesignDocument {
    encode_at(diagram, timestamp_now())
}

/// Captures the diagram with a caller-provided timestamp.
pub fn encode_at(diagram: &Diagram, timestamp: impl Into<String>) -> DesignDocument {
    DesignDocument {
        timestamp: Some(timestamp.into()),
        ..DesignDocument::from_diagram(diagram)
    }
}

/// Builds a fresh diagram from a parsed document.
///
/// Components without an id, or with a blank one (`""` or `0`), get a random
/// one. Components whose id repeats an earlier one or whose geometry is not
/// finite, and connections that are dangling, duplicated or break a
/// connection rule, are skipped with a warning. `component_size` is used for
/// records without dimensions and for components added afterwards.
pub fn decode(document: &DesignDocument, component_size: Size) -> Diagram {
    let mut diagram = Diagram::with_component_size(component_size);

    for record in &document.components {
        let id = match record.id.as_ref().filter(|raw| !raw.is_blank()) {
            Some(raw) => raw.to_id(),
            None => {
                let id = fallback_id(&diagram);
                warn!(component_id:% = id, kind = record.kind.as_str(); "Component without id, generated one");
                id
            }
        };

        let mut instance = ComponentInstance::new(
            id,
            ComponentKind::from_tag(&record.kind),
            record.position(),
            record.size(component_size),
        );
        if let Some(label) = &record.label {
            instance = instance.with_label(label.as_str());
        }
        if let Some(points) = &record.connection_points {
            instance = instance.with_pins(points.iter().map(Pin::from).collect());
        }

        if let Err(err) = diagram.insert_component(instance) {
            warn!(err:% = err; "Skipping component");
        }
    }

    for record in &document.connections {
        let start = record.from.to_pin_ref();
        let end = record.to.to_pin_ref();
        let result = match &record.id {
            Some(raw) => diagram.insert_connection(raw.to_id(), start, end).map(|_| ()),
            None => diagram.add_connection(start, end).map(|_| ()),
        };
        if let Err(err) = result {
            warn!(err:% = err; "Skipping connection");
        }
    }

    debug!(
        components = diagram.component_count(),
        connections = diagram.connection_count();
        "Design decoded"
    );
    diagram
}

/// Parses and decodes a document using the default component size.
///
/// # Errors
///
/// Returns [`DesignError::InvalidFormat`] if the document cannot be parsed.
pub fn from_json(text: &str) -> Result<Diagram, DesignError> {
    let document = DesignDocument::from_json(text)?;
    Ok(decode(&document, DEFAULT_COMPONENT_SIZE))
}

fn fallback_id(diagram: &Diagram) -> Id {
    loop {
        let id = Id::random(FALLBACK_ID_LEN);
        if diagram.component(id).is_none() {
            return id;
        }
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Current UTC time as an RFC 3339 string with millisecond precision.
pub fn timestamp_now() -> String {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_timestamp(elapsed.as_secs(), elapsed.subsec_millis())
}

/// Formats seconds since the Unix epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(secs: u64, millis: u32) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        rem / 3600,
        rem % 3600 / 60,
        rem % 60,
    )
}

/// Proleptic Gregorian date for a day count relative to 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use cpuforge_core::catalog::ComponentType;

    use super::*;

    #[test]
    fn test_missing_lists_are_invalid() {
        for text in [r#"{"connections": []}"#, r#"{"components": []}"#, "not json"] {
            let err = DesignDocument::from_json(text).unwrap_err();
            assert!(matches!(err, DesignError::InvalidFormat(_)), "{text}");
        }
    }

    #[test]
    fn test_encode_shape() {
        let mut diagram = Diagram::new();
        let alu = diagram
            .add_component(ComponentType::Alu, Point::new(50.0, 30.0))
            .unwrap()
            .id();
        let doc = encode_at(&diagram, "2024-01-01T00:00:00.000Z");
        let value = serde_json::to_value(&doc).unwrap();

        let component = &value["components"][0];
        assert_eq!(component["id"], alu.to_string());
        assert_eq!(component["type"], "alu");
        assert_eq!(component["label"], "ALU");
        assert_eq!(component["position"]["x"], 0.0);
        assert_eq!(component["dimensions"]["height"], 60.0);
        assert_eq!(component["connectionPoints"][2]["type"], "output");
        assert!(component.get("x").is_none());
        assert_eq!(value["timestamp"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_missing_component_id_is_generated() {
        let text = r#"{
            "components": [{ "type": "register", "x": 10, "y": 20 }],
            "connections": []
        }"#;
        let diagram = from_json(text).unwrap();
        let comp = diagram.components().next().unwrap();

        assert_eq!(comp.id().to_string().len(), FALLBACK_ID_LEN);
        assert_eq!(comp.position(), Point::new(10.0, 20.0));
        assert_eq!(comp.pins(), ComponentType::Register.pins());
    }

    #[test]
    fn test_blank_component_ids_are_regenerated() {
        let text = r#"{
            "components": [{ "id": "", "type": "alu" }, { "id": 0, "type": "memory" }],
            "connections": []
        }"#;
        let diagram = from_json(text).unwrap();

        assert_eq!(diagram.component_count(), 2);
        for comp in diagram.components() {
            assert_eq!(comp.id().to_string().len(), FALLBACK_ID_LEN);
        }
        assert!(diagram.component(Id::new("0")).is_none());
    }

    #[test]
    fn test_non_finite_records_are_dropped() {
        let mut document = encode_at(
            &crate::presets::Example::Simple8Bit.build().unwrap(),
            "2024-01-01T00:00:00.000Z",
        );
        document.components[0].position = Some(PositionRecord {
            x: f64::NAN,
            y: 0.0,
        });
        document.components[1].dimensions = Some(DimensionsRecord {
            width: f64::INFINITY,
            height: 60.0,
        });

        let diagram = decode(&document, DEFAULT_COMPONENT_SIZE);
        assert_eq!(diagram.component_count(), 5);
        assert!(diagram.component(Id::new("alu1")).is_none());
        assert!(diagram.component(Id::new("reg1")).is_none());

        let text = encode_at(&diagram, "2024-01-01T00:00:00.000Z").to_json().unwrap();
        assert_eq!(from_json(&text).unwrap().component_count(), 5);
    }

    #[test]
    fn test_legacy_document_with_embedded_objects() {
        let text = r#"{
            "components": [
                { "id": 1, "type": "register", "x": 0, "y": 0, "width": 100, "height": 60,
                  "label": "R0",
                  "connectionPoints": [
                      { "id": "in", "x": 0, "y": 30, "type": "input", "label": "Data In" },
                      { "id": "out", "x": 100, "y": 30, "type": "output", "label": "Data Out" }
                  ] },
                { "id": 2, "type": "alu", "x": 200, "y": 0 }
            ],
            "connections": [
                { "id": 3,
                  "start": { "component": { "id": 1, "type": "register" }, "point": { "id": "out", "type": "output" } },
                  "end": { "component": { "id": 2 }, "point": { "id": "in1" } } }
            ]
        }"#;
        let diagram = from_json(text).unwrap();

        assert_eq!(diagram.component_count(), 2);
        assert_eq!(diagram.component(Id::new("1")).unwrap().label(), "R0");
        let conn = diagram.connection(Id::new("3")).unwrap();
        assert_eq!(conn.start(), &PinRef::new(Id::new("1"), "out"));
        assert_eq!(conn.end(), &PinRef::new(Id::new("2"), "in1"));
    }

    #[test]
    fn test_invalid_records_are_dropped() {
        let text = r#"{
            "components": [
                { "id": "a", "type": "register" },
                { "id": "a", "type": "alu" },
                { "id": "b", "type": "register" }
            ],
            "connections": [
                { "from": { "component": "a", "point": "out" }, "to": { "component": "ghost", "point": "in" } },
                { "from": { "component": "a", "point": "out" }, "to": { "component": "a", "point": "in" } },
                { "from": { "component": "a", "point": "in" }, "to": { "component": "b", "point": "in" } },
                { "from": { "component": "a", "point": "out" }, "to": { "component": "b", "point": "in" } }
            ]
        }"#;
        let diagram = from_json(text).unwrap();

        assert_eq!(diagram.component_count(), 2);
        assert!(diagram.component(Id::new("a")).unwrap().kind().is(ComponentType::Register));
        assert_eq!(diagram.connection_count(), 1);
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let text = r#"{"components": [{"id": "q", "type": "qpu"}], "connections": []}"#;
        let diagram = from_json(text).unwrap();
        let comp = diagram.component(Id::new("q")).unwrap();

        assert_eq!(comp.kind().tag(), "qpu");
        assert!(comp.pins().is_empty());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0, 0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(951_782_400, 5), "2000-02-29T00:00:00.005Z");
        assert_eq!(format_timestamp(1_704_067_199, 999), "2023-12-31T23:59:59.999Z");
    }
}
