//! Template-driven source generation.

pub mod cpp;
pub mod parser;
pub mod writer;

pub use cpp::{CppCodeGenerator, CppTarget};
pub use parser::{CodeTarget, TemplateParser};
pub use writer::CodeWriter;
