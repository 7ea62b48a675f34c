//! formgen: a typed UI object model and a template-driven C++ code generator.
//!
//! Class definitions are loaded into a [`registry::TypeRegistry`], projects are
//! built as [`model::ObjectTree`]s through the registry factory, and
//! [`codegen::CppCodeGenerator`] turns a project tree into a header and a
//! source file.
#![deny(unsafe_code)]

pub mod codegen;
pub mod components;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod registry;

pub use error::{Error, Result};
