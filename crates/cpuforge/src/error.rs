//! Error types for cpuforge operations.
//!
//! This module provides the main error type [`DesignError`]. None of its
//! variants is fatal: a rejected connection or a missing element leaves the
//! diagram untouched, and a malformed document is reported before anything
//! is replaced. Design defects (missing parts, cycles) are never errors; they
//! are reported as findings by [`crate::validate`].

use std::{fmt, io};

use thiserror::Error;

use cpuforge_core::geometry::Point;

use crate::rules::ConnectionRejection;

/// The kind of diagram element an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Component,
    Connection,
    Pin,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Component => write!(f, "component"),
            ElementKind::Connection => write!(f, "connection"),
            ElementKind::Pin => write!(f, "pin"),
        }
    }
}

/// The main error type for cpuforge operations.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Connection rejected: {0}")]
    RejectedConnection(#[from] ConnectionRejection),

    #[error("Invalid design format: {0}")]
    InvalidFormat(String),

    #[error("No {kind} with id `{id}`")]
    NotFound { kind: ElementKind, id: String },

    #[error("Coordinates ({x}, {y}) are not finite")]
    NonFiniteCoordinates { x: f64, y: f64 },

    #[error("Duplicate {kind} id `{id}`")]
    DuplicateId { kind: ElementKind, id: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(serde_json::Error),
}

impl DesignError {
    /// Create a `NotFound` error for the given element.
    pub fn not_found(kind: ElementKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a `DuplicateId` error for the given element.
    pub fn duplicate(kind: ElementKind, id: impl ToString) -> Self {
        Self::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a `NonFiniteCoordinates` error for the given point.
    pub fn non_finite(point: Point) -> Self {
        Self::NonFiniteCoordinates {
            x: point.x(),
            y: point.y(),
        }
    }

    /// Returns `true` for errors that callers may treat as a no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DesignError::NotFound { .. })
    }
}
