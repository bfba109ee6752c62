//! Error adapter for converting library errors and validation findings into
//! miette diagnostics.
//!
//! This module provides the bridge between the library's plain error and
//! report types and miette's rich diagnostic formatting used in the CLI.

use std::{error::Error as _, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity};

use cpuforge::{
    DesignError,
    validate::{Finding, Report, Severity},
};

/// Adapter for a [`DesignError`].
pub struct ErrorAdapter<'a>(pub &'a DesignError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            DesignError::RejectedConnection(_) => "cpuforge::rule",
            DesignError::InvalidFormat(_) => "cpuforge::format",
            DesignError::NotFound { .. } => "cpuforge::not_found",
            DesignError::DuplicateId { .. } => "cpuforge::duplicate",
            DesignError::NonFiniteCoordinates { .. } => "cpuforge::geometry",
            DesignError::Io(_) => "cpuforge::io",
            DesignError::Serialize(_) => "cpuforge::serialize",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            DesignError::InvalidFormat(_) => {
                "a design file is a JSON object with `components` and `connections` lists"
            }
            DesignError::RejectedConnection(_) => {
                "connect an output pin to an input pin on a different component"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Adapter for a warning or error [`Finding`] from a validation report.
pub struct FindingAdapter<'a>(pub &'a Finding);

impl fmt::Debug for FindingAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for FindingAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.title())
    }
}

impl std::error::Error for FindingAdapter<'_> {}

impl MietteDiagnostic for FindingAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("cpuforge::validate"))
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.0.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
            Severity::Success => MietteSeverity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.0.message()))
    }
}

/// A reportable item that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A library error.
    Error(ErrorAdapter<'a>),
    /// A validation finding.
    Finding(FindingAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Error(e) => fmt::Display::fmt(e, f),
            Reportable::Finding(d) => fmt::Display::fmt(d, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Error(e) => e.source(),
            Reportable::Finding(_) => None,
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Error(e) => e.code(),
            Reportable::Finding(d) => d.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Error(e) => e.severity(),
            Reportable::Finding(d) => d.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Error(e) => e.help(),
            Reportable::Finding(d) => d.help(),
        }
    }
}

/// Convert a [`DesignError`] into a list of reportable errors.
pub fn to_reportables(err: &DesignError) -> Vec<Reportable<'_>> {
    vec![Reportable::Error(ErrorAdapter(err))]
}

/// Collect the error findings of a validation report.
pub fn error_findings(report: &Report) -> Vec<Reportable<'_>> {
    report
        .iter()
        .filter(|finding| finding.severity().is_error())
        .map(|finding| Reportable::Finding(FindingAdapter(finding)))
        .collect()
}
