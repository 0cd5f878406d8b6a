//! The reporting channel between the network and whoever is feeding it.

use super::error::{InputError, InputWarning};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// Where in the survey data the current observation came from. Supplied by
/// the reading layer through the survey context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A structured report handed to the `Reporter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Numeric message code, stable across translations.
    pub code: u32,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn from_error(err: &InputError, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Error,
            code: err.code(),
            message: err.to_string(),
            location,
        }
    }

    pub fn from_warning(warning: &InputWarning, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Warning,
            code: warning.code(),
            message: warning.to_string(),
            location,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.location {
            Some(loc) => write!(f, "{loc}: {kind}: {}", self.message),
            None => write!(f, "{kind}: {}", self.message),
        }
    }
}

/// Receives user-facing errors and warnings.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects everything, for callers that want to inspect reports afterwards.
impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Default channel: forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(code = diagnostic.code, "{}", diagnostic),
            Severity::Error => tracing::error!(code = diagnostic.code, "{}", diagnostic),
        }
    }
}
