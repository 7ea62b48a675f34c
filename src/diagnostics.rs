//! Side-channel diagnostics for template interpretation and code generation.
//!
//! Generation never stops on per-node problems. Each problem is recorded as a
//! [`Diagnostic`] and logged through `tracing`, and the walk continues.

use std::cell::RefCell;
use std::fmt;

use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Kind of problem, matching the variants of [`crate::error::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    TypeNotFound,
    StructuralViolation,
    MissingProperty,
    TemplateResolution,
    MalformedTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Class of the object being processed, when known.
    pub class: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.class {
            Some(class) => write!(f, "{level}: [{class}] {}", self.message),
            None => write!(f, "{level}: {}", self.message),
        }
    }
}

/// Collects diagnostics during one generation pass.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: RefCell<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        let class = diagnostic.class.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Warning => warn!(class = %class, kind = ?diagnostic.kind, "{}", diagnostic.message),
            Severity::Error => error!(class = %class, kind = ?diagnostic.kind, "{}", diagnostic.message),
        }
        self.entries.borrow_mut().push(diagnostic);
    }

    pub fn warning(&self, kind: DiagnosticKind, class: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            class: class.map(str::to_string),
            message: message.into(),
        });
    }

    pub fn error(&self, kind: DiagnosticKind, class: Option<&str>, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: Severity::Error,
            kind,
            class: class.map(str::to_string),
            message: message.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.entries.take()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
