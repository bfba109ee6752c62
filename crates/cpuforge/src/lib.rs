//! Cpuforge - diagram store and validation engine for processor block
//! diagrams.
//!
//! A design is a [`Diagram`](diagram::Diagram) of placed components (ALU,
//! registers, memory, ...) whose input and output pins are wired together by
//! connections. The crate provides:
//!
//! - the [`diagram`] store and its invariants,
//! - the connection [`rules`],
//! - structural [`validate`]ion, including cycle detection over the
//!   component [`graph`],
//! - the JSON [`snapshot`] codec used for export, import and sessions,
//! - placeholder artifact [`generate`]ion and bundled [`presets`],
//! - an instruction console that describes commands ([`simulate`]),
//! - an [`Editor`](session::Editor) controller for UI layers.
//!
//! # Examples
//!
//! ```rust
//! use cpuforge::{
//!     catalog::ComponentType,
//!     diagram::{Diagram, PinRef},
//!     geometry::Point,
//!     validate::validate,
//! };
//!
//! let mut diagram = Diagram::new();
//! let reg = diagram.add_component(ComponentType::Register, Point::new(100.0, 100.0))?.id();
//! let alu = diagram.add_component(ComponentType::Alu, Point::new(300.0, 100.0))?.id();
//! diagram.add_connection(PinRef::new(reg, "out"), PinRef::new(alu, "in1"))?;
//!
//! let report = validate(&diagram);
//! assert!(!report.has_errors());
//! # Ok::<(), cpuforge::DesignError>(())
//! ```

pub mod config;
pub mod diagram;
pub mod generate;
pub mod graph;
pub mod presets;
pub mod rules;
pub mod session;
pub mod simulate;
pub mod snapshot;
pub mod validate;

mod error;

pub use cpuforge_core::{catalog, geometry, identifier};

pub use error::{DesignError, ElementKind};

use std::{fs, path::Path};

use log::{debug, info};

use config::AppConfig;
use diagram::Diagram;
use snapshot::DesignDocument;

/// Reads and decodes a design file.
///
/// # Errors
///
/// - [`DesignError::Io`] if the file cannot be read.
/// - [`DesignError::InvalidFormat`] if it is not a design document.
pub fn load_design(path: impl AsRef<Path>, config: &AppConfig) -> Result<Diagram, DesignError> {
    let path = path.as_ref();
    debug!(path:? = path; "Reading design");
    let text = fs::read_to_string(path)?;
    let document = DesignDocument::from_json(&text)?;
    let diagram = snapshot::decode(&document, config.editor().component_size());
    info!(
        components = diagram.component_count(),
        connections = diagram.connection_count();
        "Design loaded"
    );
    Ok(diagram)
}

/// Writes `diagram` as a pretty-printed export document.
///
/// # Errors
///
/// Returns [`DesignError::Io`] if the file cannot be written.
pub fn save_design(path: impl AsRef<Path>, diagram: &Diagram) -> Result<(), DesignError> {
    let path = path.as_ref();
    let text = snapshot::encode(diagram).to_json_pretty()?;
    fs::write(path, text)?;
    info!(path:? = path; "Design exported");
    Ok(())
}
