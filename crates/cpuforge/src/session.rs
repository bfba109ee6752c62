//! Editor controller with session persistence.
//!
//! [`Editor`] is the object a UI layer drives. It owns the [`Diagram`], the
//! [`AppConfig`], a [`SessionStore`] slot and an [`Autosave`] timer. Every
//! mutating operation writes the whole diagram to the session slot, and
//! [`Editor::tick`] writes it again whenever the autosave interval has
//! elapsed. Everything runs on the caller's thread; no operation blocks.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use cpuforge_core::{catalog::ComponentKind, geometry::Point, identifier::Id};

use crate::{
    config::AppConfig,
    diagram::{ComponentInstance, Diagram, PinRef},
    error::DesignError,
    generate::{self, Target},
    presets::Example,
    rules::ConnectionRejection,
    simulate::{self, ConsoleEntry},
    snapshot::{self, DesignDocument},
    validate::{self, Report},
};

/// A volatile key-value slot holding serialized diagrams.
pub trait SessionStore {
    /// Overwrites the value stored under `key`.
    fn save(&mut self, key: &str, data: String);

    fn load(&self, key: &str) -> Option<String>;
}

/// Process-local [`SessionStore`]; contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    slots: HashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn save(&mut self, key: &str, data: String) {
        self.slots.insert(key.to_string(), data);
    }

    fn load(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }
}

/// Fixed-interval timer deciding when [`Editor::tick`] should save.
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: Duration,
    last: Option<Instant>,
}

impl Autosave {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` if no save happened yet or the interval has elapsed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }
}

/// Result of clicking at a point while wiring pins.
#[derive(Debug, Clone, PartialEq)]
pub enum PinClick {
    /// No pin under the pointer; any pending start pin is kept.
    Missed,
    /// The pin became the pending start of a new connection.
    Started(PinRef),
    /// The pending pin and this one were connected.
    Connected(Id),
    /// The two pins may not be connected; the pending pin was dropped.
    Rejected(ConnectionRejection),
}

/// UI-facing controller owning a diagram and its session slot.
#[derive(Debug)]
pub struct Editor<S: SessionStore = MemorySession> {
    diagram: Diagram,
    config: AppConfig,
    session: S,
    autosave: Autosave,
    pending: Option<PinRef>,
    console: Vec<ConsoleEntry>,
}

impl Default for Editor<MemorySession> {
    fn default() -> Self {
        Self::new(AppConfig::default(), MemorySession::new())
    }
}

impl<S: SessionStore> Editor<S> {
    pub fn new(config: AppConfig, session: S) -> Self {
        Self {
            diagram: Diagram::with_component_size(config.editor().component_size()),
            autosave: Autosave::new(config.session().autosave_interval()),
            config,
            session,
            pending: None,
            console: Vec::new(),
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Start pin of a connection being wired, if any.
    pub fn pending_pin(&self) -> Option<&PinRef> {
        self.pending.as_ref()
    }

    /// Rehydrates the diagram from the session slot.
    ///
    /// Returns `Ok(false)` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidFormat`] if the slot holds an
    /// unreadable document; the diagram is left as it was.
    pub fn restore(&mut self) -> Result<bool, DesignError> {
        let Some(text) = self.session.load(self.config.session().key()) else {
            debug!("Session slot empty");
            return Ok(false);
        };
        let document = DesignDocument::from_json(&text)?;
        self.diagram = snapshot::decode(&document, self.config.editor().component_size());
        self.pending = None;
        info!(components = self.diagram.component_count(); "Session restored");
        Ok(true)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Places a component centered on `center` and returns its id.
    pub fn add_component(
        &mut self,
        kind: impl Into<ComponentKind>,
        center: Point,
    ) -> Result<Id, DesignError> {
        let id = self.diagram.add_component(kind, center)?.id();
        self.persist();
        Ok(id)
    }

    pub fn move_component(&mut self, id: Id, position: Point) -> Result<(), DesignError> {
        self.diagram.move_component(id, position)?;
        self.persist();
        Ok(())
    }

    pub fn remove_component(&mut self, id: Id) -> Result<ComponentInstance, DesignError> {
        let removed = self.diagram.remove_component(id)?;
        if self
            .pending
            .as_ref()
            .is_some_and(|pin| pin.component() == id)
        {
            self.pending = None;
        }
        self.persist();
        Ok(removed)
    }

    pub fn add_connection(&mut self, start: PinRef, end: PinRef) -> Result<Id, DesignError> {
        let id = self.diagram.add_connection(start, end)?.id();
        self.persist();
        Ok(id)
    }

    pub fn remove_connection(&mut self, id: Id) -> Result<(), DesignError> {
        self.diagram.remove_connection(id)?;
        self.persist();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.diagram.clear();
        self.pending = None;
        self.persist();
    }

    /// Handles a click while wiring: the first pin hit becomes pending, the
    /// second one is connected to it.
    ///
    /// # Errors
    ///
    /// Only store errors other than a rule rejection are returned.
    pub fn click_pin(&mut self, point: Point) -> Result<PinClick, DesignError> {
        let tolerance = self.config.editor().pin_tolerance();
        let Some((component, pin)) = self.diagram.pin_at(point, tolerance) else {
            return Ok(PinClick::Missed);
        };
        let clicked = PinRef::new(component.id(), pin.id());

        let Some(start) = self.pending.take() else {
            self.pending = Some(clicked.clone());
            return Ok(PinClick::Started(clicked));
        };

        match self.add_connection(start, clicked) {
            Ok(id) => Ok(PinClick::Connected(id)),
            Err(DesignError::RejectedConnection(rejection)) => Ok(PinClick::Rejected(rejection)),
            Err(err) => Err(err),
        }
    }

    /// Replaces the diagram with a parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::InvalidFormat`] if the text cannot be parsed;
    /// the current diagram is untouched in that case.
    pub fn load_document(&mut self, text: &str) -> Result<(), DesignError> {
        let document = DesignDocument::from_json(text)?;
        self.diagram = snapshot::decode(&document, self.config.editor().component_size());
        self.pending = None;
        self.persist();
        info!(
            components = self.diagram.component_count(),
            connections = self.diagram.connection_count();
            "Design loaded"
        );
        Ok(())
    }

    /// Replaces the diagram with a bundled example.
    pub fn load_example(&mut self, example: Example) -> Result<(), DesignError> {
        let mut diagram = Diagram::with_component_size(self.config.editor().component_size());
        example.populate(&mut diagram)?;
        self.diagram = diagram;
        self.pending = None;
        self.persist();
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Pretty-printed export document stamped with the current time.
    pub fn export_document(&self) -> Result<String, DesignError> {
        snapshot::encode(&self.diagram).to_json_pretty()
    }

    pub fn validate(&self) -> Report {
        validate::validate(&self.diagram)
    }

    /// Generates an artifact, using the configured default target when
    /// `target` is `None`.
    pub fn generate(&self, target: Option<Target>) -> Result<String, DesignError> {
        let target = target.unwrap_or(self.config.generate().default_target());
        generate::generate(&self.diagram, target, &snapshot::timestamp_now())
    }

    /// Runs a console command and appends it to the console history.
    ///
    /// Blank input is ignored and returns `None`.
    pub fn execute(&mut self, line: &str) -> Option<&ConsoleEntry> {
        let entry = simulate::run_line(line, snapshot::timestamp_now()).ok()?;
        info!(command:% = entry.input(); "Command executed");
        self.console.push(entry);
        self.console.last()
    }

    /// Console history, oldest first.
    pub fn console(&self) -> &[ConsoleEntry] {
        &self.console
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Saves the diagram if the autosave interval has elapsed.
    ///
    /// Returns `true` when a save happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.autosave.is_due(now) {
            return false;
        }
        self.persist();
        self.autosave.mark(now);
        true
    }

    fn persist(&mut self) {
        match DesignDocument::from_diagram(&self.diagram).to_json() {
            Ok(text) => self.session.save(self.config.session().key(), text),
            Err(err) => warn!(err:% = err; "Failed to persist session"),
        }
    }
}
