//! Error handling for the formgen library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Loading and factory operations
//! return these errors; the template interpreter and the code emitter report
//! through [`crate::diagnostics`] instead and never abort mid-walk.
//!
//! # Examples
//!
//! ```
//! use formgen::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::type_not_found("wxGizmo"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for formgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for formgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A definition document could not be loaded. The registry is unaffected.
    #[error("Failed to load definition document '{document}': {message}")]
    DefinitionLoad { document: String, message: String },

    /// Unknown class name
    #[error("Unknown class '{0}'")]
    TypeNotFound(String),

    /// The requested child can not be placed under the parent
    #[error("'{class}' can not be a child of '{parent}'")]
    StructuralViolation { class: String, parent: String },

    /// A required property is absent
    #[error("Missing property '{property}' in '{class}'")]
    MissingProperty { class: String, property: String },

    /// No template for a visited slot, or an unresolvable property reference
    #[error("Template resolution error: {0}")]
    TemplateResolution(String),

    /// Internal-consistency failure while walking templates
    #[error("Malformed template: {0}")]
    MalformedTemplate(String),

    /// Invalid object tree mutation
    #[error("Object tree error: {0}")]
    Tree(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new definition loading error
    pub fn definition<D: Into<String>, M: Into<String>>(document: D, message: M) -> Self {
        Self::DefinitionLoad {
            document: document.into(),
            message: message.into(),
        }
    }

    pub fn tree<S: Into<String>>(msg: S) -> Self {
        Self::Tree(msg.into())
    }

    pub fn type_not_found<S: Into<String>>(class: S) -> Self {
        Self::TypeNotFound(class.into())
    }

    pub fn structural<C: Into<String>, P: Into<String>>(class: C, parent: P) -> Self {
        Self::StructuralViolation {
            class: class.into(),
            parent: parent.into(),
        }
    }

    pub fn missing_property<C: Into<String>, P: Into<String>>(class: C, property: P) -> Self {
        Self::MissingProperty {
            class: class.into(),
            property: property.into(),
        }
    }
}
