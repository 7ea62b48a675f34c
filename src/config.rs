//! Configuration for loading definitions and generating code.
//!
//! ```toml
//! definitions_dir = "/usr/share/formgen/definitions"
//! first_id = 2000
//! use_relative_paths = true
//! base_path = "."
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::codegen::cpp::{DEFAULT_BITMAP_CACHE_SIZE, DEFAULT_FIRST_ID};
use crate::error::{Error, Result};
use crate::registry::DEFAULT_LANGUAGE;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `objtypes.yaml` and the package documents. Searched
    /// for when unset.
    pub definitions_dir: Option<PathBuf>,
    /// Class name of the target-language interface base.
    pub language: String,
    /// First number assigned to generated IDs.
    pub first_id: i64,
    pub use_relative_paths: bool,
    pub base_path: PathBuf,
    pub bitmap_cache_size: usize,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            definitions_dir: None,
            language: DEFAULT_LANGUAGE.to_string(),
            first_id: DEFAULT_FIRST_ID,
            use_relative_paths: false,
            base_path: PathBuf::from("."),
            bitmap_cache_size: DEFAULT_BITMAP_CACHE_SIZE,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.bitmap_cache_size == 0 {
            return Err(Error::config("bitmap_cache_size must be at least 1"));
        }
        // only the C++ emitter exists
        if config.language != DEFAULT_LANGUAGE {
            return Err(Error::config(format!(
                "Unsupported language '{}', expected '{DEFAULT_LANGUAGE}'",
                config.language
            )));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// Configured definitions directory, or the first candidate location
    /// that holds an `objtypes.yaml`.
    pub fn resolve_definitions_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.definitions_dir {
            return Ok(dir.clone());
        }
        let locations = Self::definition_search_locations();
        for location in &locations {
            debug!(path = %location.display(), "Looking for definitions");
            if location.join("objtypes.yaml").is_file() {
                return Ok(location.clone());
            }
        }
        Err(Error::config(
            "No definitions directory found; pass --definitions or set definitions_dir",
        ))
    }

    fn definition_search_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();

        if let Ok(current_dir) = std::env::current_dir() {
            locations.push(current_dir.join("definitions"));
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            locations.push(exe_dir.join("definitions"));
            if let Some(parent) = exe_dir.parent() {
                locations.push(parent.join("definitions"));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            locations.push(config_dir.join("formgen").join("definitions"));
        }

        locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.first_id, 1000);
        assert_eq!(config.language, "C++");
        assert!(!config.use_relative_paths);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("first_id = 2000\nuse_relative_paths = true\n").unwrap();
        assert_eq!(config.first_id, 2000);
        assert!(config.use_relative_paths);
        assert_eq!(config.bitmap_cache_size, DEFAULT_BITMAP_CACHE_SIZE);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(Config::from_toml("first_id = \"x\""), Err(Error::Toml(_))));
        assert!(matches!(
            Config::from_toml("bitmap_cache_size = 0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unsupported_language_is_rejected() {
        let err = Config::from_toml("language = \"Python\"").unwrap_err();
        assert!(matches!(&err, Error::Config(msg) if msg.contains("Python")));
        let config = Config::from_toml("language = \"C++\"").unwrap();
        assert_eq!(config.language, "C++");
    }

    #[test]
    fn test_load_and_explicit_definitions_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("formgen.toml");
        fs::write(
            &path,
            format!("definitions_dir = {:?}\n", dir.path().display().to_string()),
        )
        .unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.resolve_definitions_dir().unwrap(), dir.path());
        assert!(Config::load(&dir.path().join("missing.toml")).is_err());
    }
}
