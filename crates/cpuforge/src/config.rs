//! Configuration types for the processor design editor.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! partial (or empty) configuration file is always valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`EditorConfig`] - Component placement and pin hit testing.
//! - [`SessionConfig`] - Session slot key and autosave interval.
//! - [`GenerateConfig`] - Default artifact target.
//!
//! # Example
//!
//! ```
//! # use cpuforge::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.session().key(), "processorDesign");
//! ```

use std::time::Duration;

use serde::Deserialize;

use cpuforge_core::geometry::Size;

use crate::generate::Target;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    editor: EditorConfig,

    #[serde(default)]
    session: SessionConfig,

    #[serde(default)]
    generate: GenerateConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(editor: EditorConfig, session: SessionConfig, generate: GenerateConfig) -> Self {
        Self {
            editor,
            session,
            generate,
        }
    }

    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    pub fn generate(&self) -> &GenerateConfig {
        &self.generate
    }
}

/// Placement and hit-testing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    component_width: f64,
    component_height: f64,
    /// Maximum distance from a pin anchor that still counts as a hit.
    pin_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            component_width: 100.0,
            component_height: 60.0,
            pin_tolerance: 10.0,
        }
    }
}

impl EditorConfig {
    /// Size given to newly placed components.
    pub fn component_size(&self) -> Size {
        Size::new(self.component_width, self.component_height)
    }

    pub fn pin_tolerance(&self) -> f64 {
        self.pin_tolerance
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    key: String,
    autosave_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: "processorDesign".to_string(),
            autosave_interval_ms: 5000,
        }
    }
}

impl SessionConfig {
    /// Name of the session slot holding the serialized diagram.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }
}

/// Artifact generation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    default_target: Target,
}

impl GenerateConfig {
    /// Returns the [`Target`] used when none is requested explicitly.
    pub fn default_target(&self) -> Target {
        self.default_target
    }
}
