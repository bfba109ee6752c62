//! The diagram store.
//!
//! [`Diagram`] owns every placed [`ComponentInstance`] and every
//! [`Connection`] between their pins, and is the only way to mutate them.
//! It keeps the following invariants at all times:
//!
//! - component ids are unique, and so are connection ids;
//! - both endpoints of every connection exist (component and pin);
//! - a connection never joins two pins of the same component;
//! - a connection always joins an input pin and an output pin.
//!
//! Components and connections keep their insertion order, which is also the
//! order used by hit testing and by the validator.

mod component;
mod connection;

pub use component::ComponentInstance;
pub use connection::{Connection, PinRef};

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};

use cpuforge_core::{
    catalog::{ComponentKind, DEFAULT_COMPONENT_SIZE, Pin},
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    error::{DesignError, ElementKind},
    rules::{self, Endpoint},
};

/// Length of generated component and connection ids.
const GENERATED_ID_LEN: usize = 12;

/// Mutable set of placed components and the connections between them.
#[derive(Debug, Clone)]
pub struct Diagram {
    components: IndexMap<Id, ComponentInstance>,
    connections: IndexMap<Id, Connection>,
    /// Connection ids incident to each component, for cascade deletion.
    incident: HashMap<Id, Vec<Id>>,
    component_size: Size,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// Creates an empty diagram whose new components are 100×60.
    pub fn new() -> Self {
        Self::with_component_size(DEFAULT_COMPONENT_SIZE)
    }

    /// Creates an empty diagram whose new components have the given size.
    pub fn with_component_size(component_size: Size) -> Self {
        Self {
            components: IndexMap::new(),
            connections: IndexMap::new(),
            incident: HashMap::new(),
            component_size,
        }
    }

    /// Size given to components placed through [`Diagram::add_component`].
    pub fn component_size(&self) -> Size {
        self.component_size
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Places a new component so that `center` is its geometric center.
    ///
    /// A kind the catalog does not know gets no pins.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::NonFiniteCoordinates`] if `center` has a NaN or
    /// infinite coordinate, or the resulting corner overflows.
    pub fn add_component(
        &mut self,
        kind: impl Into<ComponentKind>,
        center: Point,
    ) -> Result<&ComponentInstance, DesignError> {
        let top_left = center.sub_point(self.component_size.half_extents());
        if !center.is_finite() || !top_left.is_finite() {
            debug!(center:? = center; "Component placement rejected");
            return Err(DesignError::non_finite(center));
        }

        let kind = kind.into();
        let id = self.fresh_id();
        let instance = ComponentInstance::new(id, kind, top_left, self.component_size);

        debug!(component_id:% = id, kind:% = instance.kind(); "Component added");
        self.incident.insert(id, Vec::new());
        Ok(&*self.components.entry(id).or_insert(instance))
    }

    /// Inserts a fully built instance, keeping its id.
    ///
    /// # Errors
    ///
    /// - [`DesignError::DuplicateId`] if a component with the same id
    ///   already exists.
    /// - [`DesignError::NonFiniteCoordinates`] if its position, size or any
    ///   pin offset is NaN or infinite.
    pub fn insert_component(
        &mut self,
        instance: ComponentInstance,
    ) -> Result<&ComponentInstance, DesignError> {
        let id = instance.id();
        if self.components.contains_key(&id) {
            return Err(DesignError::duplicate(ElementKind::Component, id));
        }
        if !instance.is_finite() {
            return Err(DesignError::non_finite(instance.position()));
        }

        trace!(component:? = instance; "Component inserted");
        self.incident.insert(id, Vec::new());
        Ok(&*self.components.entry(id).or_insert(instance))
    }

    /// Moves a component so its top-left corner is at `position`.
    ///
    /// # Errors
    ///
    /// - [`DesignError::NotFound`] if the id is absent.
    /// - [`DesignError::NonFiniteCoordinates`] if `position` is NaN or
    ///   infinite.
    ///
    /// The diagram is unchanged on error.
    pub fn move_component(&mut self, id: Id, position: Point) -> Result<(), DesignError> {
        if !position.is_finite() {
            return Err(DesignError::non_finite(position));
        }
        let component = self
            .components
            .get_mut(&id)
            .ok_or_else(|| DesignError::not_found(ElementKind::Component, id))?;
        component.set_position(position);
        Ok(())
    }

    /// Removes a component and every connection that references it.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::NotFound`] if the id is absent.
    pub fn remove_component(&mut self, id: Id) -> Result<ComponentInstance, DesignError> {
        let instance = self
            .components
            .shift_remove(&id)
            .ok_or_else(|| DesignError::not_found(ElementKind::Component, id))?;

        let incident = self.incident.remove(&id).unwrap_or_default();
        for connection_id in &incident {
            if let Some(connection) = self.connections.shift_remove(connection_id) {
                self.unlink(&connection);
            }
        }

        debug!(
            component_id:% = id,
            removed_connections = incident.len();
            "Component removed"
        );
        Ok(instance)
    }

    /// Removes every component and connection.
    pub fn clear(&mut self) {
        self.components.clear();
        self.connections.clear();
        self.incident.clear();
        debug!("Diagram cleared");
    }

    pub fn component(&self, id: Id) -> Option<&ComponentInstance> {
        self.components.get(&id)
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Position of a component in insertion order.
    pub fn component_index(&self, id: Id) -> Option<usize> {
        self.components.get_index_of(&id)
    }

    // =========================================================================
    // Connections
    // =========================================================================

    /// Connects two pins, allocating a fresh connection id.
    ///
    /// # Errors
    ///
    /// - [`DesignError::NotFound`] if either component or pin does not exist.
    /// - [`DesignError::RejectedConnection`] if the pins sit on the same
    ///   component or share a direction.
    ///
    /// On error the diagram is unchanged.
    pub fn add_connection(&mut self, start: PinRef, end: PinRef) -> Result<&Connection, DesignError> {
        let id = self.fresh_id();
        self.insert_connection(id, start, end)
    }

    /// Connects two pins using a caller-chosen connection id.
    ///
    /// # Errors
    ///
    /// Same as [`Diagram::add_connection`], plus [`DesignError::DuplicateId`]
    /// when the id is taken.
    pub fn insert_connection(
        &mut self,
        id: Id,
        start: PinRef,
        end: PinRef,
    ) -> Result<&Connection, DesignError> {
        if self.connections.contains_key(&id) {
            return Err(DesignError::duplicate(ElementKind::Connection, id));
        }

        {
            let (_, start_pin) = self.resolve_or_err(&start)?;
            let (_, end_pin) = self.resolve_or_err(&end)?;
            if let Err(rejection) = rules::check(
                Endpoint::new(start.component(), start_pin),
                Endpoint::new(end.component(), end_pin),
            ) {
                debug!(start:? = start, end:? = end, reason:% = rejection; "Connection rejected");
                return Err(rejection.into());
            }
        }

        for component in [start.component(), end.component()] {
            self.incident.entry(component).or_default().push(id);
        }

        debug!(connection_id:% = id; "Connection added");
        Ok(&*self
            .connections
            .entry(id)
            .or_insert(Connection::new(id, start, end)))
    }

    /// Removes a single connection.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::NotFound`] if the id is absent.
    pub fn remove_connection(&mut self, id: Id) -> Result<Connection, DesignError> {
        let connection = self
            .connections
            .shift_remove(&id)
            .ok_or_else(|| DesignError::not_found(ElementKind::Connection, id))?;
        self.unlink(&connection);

        debug!(connection_id:% = id; "Connection removed");
        Ok(connection)
    }

    pub fn connection(&self, id: Id) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections with at least one endpoint on `component`.
    pub fn connections_of(&self, component: Id) -> impl Iterator<Item = &Connection> {
        self.incident
            .get(&component)
            .into_iter()
            .flatten()
            .filter_map(|id| self.connections.get(id))
    }

    /// Returns `true` if any connection uses exactly this pin.
    pub fn is_pin_connected(&self, pin: &PinRef) -> bool {
        self.connections_of(pin.component())
            .any(|connection| connection.touches(pin))
    }

    /// Looks up the component and pin a reference points at.
    pub fn resolve(&self, pin: &PinRef) -> Option<(&ComponentInstance, &Pin)> {
        let component = self.components.get(&pin.component())?;
        let resolved = component.pin(pin.pin())?;
        Some((component, resolved))
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.connections.is_empty()
    }

    // =========================================================================
    // Hit testing
    // =========================================================================

    /// Returns the first component, in insertion order, whose bounds contain
    /// `point` (edges included).
    ///
    /// Overlapping components are not ordered by any z-index; the earliest
    /// placed one wins.
    pub fn component_at(&self, point: Point) -> Option<&ComponentInstance> {
        self.components()
            .find(|component| component.bounds().contains(point))
    }

    /// Returns the first pin whose anchor lies within `tolerance` of `point`,
    /// scanning components in insertion order and pins in catalog order.
    pub fn pin_at(&self, point: Point, tolerance: f64) -> Option<(&ComponentInstance, &Pin)> {
        self.components().find_map(|component| {
            component
                .pins()
                .iter()
                .find(|pin| component.anchor(pin).distance(point) <= tolerance)
                .map(|pin| (component, pin))
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn resolve_or_err(&self, pin: &PinRef) -> Result<(&ComponentInstance, &Pin), DesignError> {
        let component = self
            .components
            .get(&pin.component())
            .ok_or_else(|| DesignError::not_found(ElementKind::Component, pin.component()))?;
        let resolved = component.pin(pin.pin()).ok_or_else(|| {
            DesignError::not_found(ElementKind::Pin, format!("{}.{}", pin.component(), pin.pin()))
        })?;
        Ok((component, resolved))
    }

    /// Drops a removed connection from the incidence index of both endpoints.
    fn unlink(&mut self, connection: &Connection) {
        for component in [connection.start().component(), connection.end().component()] {
            if let Some(ids) = self.incident.get_mut(&component) {
                ids.retain(|id| *id != connection.id());
            }
        }
    }

    fn fresh_id(&self) -> Id {
        loop {
            let id = Id::random(GENERATED_ID_LEN);
            if !self.components.contains_key(&id) && !self.connections.contains_key(&id) {
                return id;
            }
        }
    }
}
