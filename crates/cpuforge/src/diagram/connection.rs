//! Connections between component pins.

use cpuforge_core::identifier::Id;

/// Reference to one pin of one placed component.
///
/// This is a plain reference: it does not keep the component alive. The
/// diagram removes every connection that mentions a component when that
/// component is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinRef {
    component: Id,
    pin: String,
}

impl PinRef {
    pub fn new(component: Id, pin: impl Into<String>) -> Self {
        Self {
            component,
            pin: pin.into(),
        }
    }

    pub fn component(&self) -> Id {
        self.component
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }
}

/// A directed wire from the `start` pin to the `end` pin.
///
/// The direction is the order in which the user picked the pins, which is
/// not necessarily output to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    id: Id,
    start: PinRef,
    end: PinRef,
}

impl Connection {
    pub(crate) fn new(id: Id, start: PinRef, end: PinRef) -> Self {
        Self { id, start, end }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn start(&self) -> &PinRef {
        &self.start
    }

    pub fn end(&self) -> &PinRef {
        &self.end
    }

    /// Returns `true` if either endpoint sits on `component`.
    pub fn references(&self, component: Id) -> bool {
        self.start.component == component || self.end.component == component
    }

    /// Returns `true` if either endpoint is exactly `pin`.
    pub fn touches(&self, pin: &PinRef) -> bool {
        self.start == *pin || self.end == *pin
    }
}
