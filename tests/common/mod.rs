//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use formgen::codegen::CppCodeGenerator;
use formgen::components::StandardLibrary;
use formgen::diagnostics::Diagnostic;
use formgen::registry::{TypeRegistry, load_project};

pub fn definitions_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("definitions")
}

/// Registry loaded from the shipped definitions.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register_library(Arc::new(StandardLibrary));
    registry
        .load_definitions(&definitions_dir())
        .expect("shipped definitions load");
    registry
}

pub struct Generated {
    pub ok: bool,
    pub header: String,
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn generate(registry: &TypeRegistry, project: &str) -> Generated {
    let (tree, root) = load_project(registry, project).expect("project loads");
    let mut generator = CppCodeGenerator::new(registry);
    let ok = generator.generate_code(&tree, root);
    Generated {
        ok,
        header: generator.header().to_string(),
        source: generator.source().to_string(),
        diagnostics: generator.diagnostics().snapshot(),
    }
}

/// Trimmed, non-empty lines of generated text.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Index of the first line equal to `expected`, panicking with the whole
/// text when it is missing.
pub fn line_index(text: &str, expected: &str) -> usize {
    lines(text)
        .iter()
        .position(|l| *l == expected)
        .unwrap_or_else(|| panic!("missing line `{expected}` in:\n{text}"))
}

/// Asserts that every line of `expected` appears in `text`, in that order.
pub fn assert_in_order(text: &str, expected: &[&str]) {
    let indices: Vec<usize> = expected.iter().map(|e| line_index(text, e)).collect();
    for pair in indices.windows(2) {
        assert!(
            pair[0] < pair[1],
            "lines out of order {expected:?} at {indices:?} in:\n{text}"
        );
    }
}
