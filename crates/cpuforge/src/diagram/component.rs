//! Placed component instances.

use cpuforge_core::{
    catalog::{ComponentKind, Pin, pins_for},
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

/// A positioned occurrence of a component type on the canvas.
///
/// The instance keeps its own copy of the pin list so anchor lookups never
/// depend on the catalog once the instance exists. Only the position is
/// mutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInstance {
    id: Id,
    kind: ComponentKind,
    position: Point,
    size: Size,
    label: String,
    pins: Vec<Pin>,
}

impl ComponentInstance {
    /// Creates an instance whose top-left corner is `position`, with the
    /// catalog pins and default label of `kind`.
    pub fn new(id: Id, kind: ComponentKind, position: Point, size: Size) -> Self {
        let pins = pins_for(&kind).to_vec();
        let label = kind.default_label();
        Self {
            id,
            kind,
            position,
            size,
            label,
            pins,
        }
    }

    /// Replaces the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Replaces the pin list, used when a document carries its own pins.
    pub fn with_pins(mut self, pins: Vec<Pin>) -> Self {
        self.pins = pins;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Top-left corner in canvas space.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin(&self, pin_id: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.id() == pin_id)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Canvas position of a pin of this instance.
    pub fn anchor(&self, pin: &Pin) -> Point {
        self.position.add_point(pin.offset())
    }

    /// Returns `true` if the position, size and every pin offset are finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.size.is_finite()
            && self.pins.iter().all(|pin| pin.offset().is_finite())
    }

    pub(super) fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}
