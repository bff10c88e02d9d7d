//! Configuration for `embedui.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── output     # [output]
//! │   ├── package    # [package]
//! │   └── tool       # [tool]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                            |
//! |-------------|----------------------------------------------------|
//! | `[tool]`    | Package manager command, version floor, timeout    |
//! | `[output]`  | Build output directory and generated header names  |
//! | `[package]` | UI directory name, package.json rewriting          |
//!
//! The file is optional: every field has a default, so a missing default
//! config file means an all-default [`Config`].

pub mod section;
pub mod types;

pub use section::{OutputConfig, PackageConfig, ToolConfig};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::log;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Default config file name, looked up in the source root.
pub const CONFIG_FILE: &str = "embedui.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `embedui.toml`.
///
/// Loaded once in `main` and passed down by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tool: ToolConfig,
    pub output: OutputConfig,
    pub package: PackageConfig,
}

impl Config {
    /// Load and validate configuration.
    ///
    /// A missing file is only an error when the path was given explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        let config = if !explicit && !path.exists() {
            crate::debug!("config"; "no {}, using defaults", path.display());
            Self::default()
        } else {
            Self::from_path(path)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Validate all sections, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.tool.validate(&mut diag);
        self.output.validate(&mut diag);
        self.package.validate(&mut diag);

        diag.into_result()
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = Config::parse_with_ignored("[tool\ncommand = \"yarn\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[tool]\ncommand = \"yarn\"\ncolour = true\n[unknown_section]\nfield = 1";
        let (config, ignored) = Config::parse_with_ignored(content).unwrap();

        assert_eq!(config.tool.command, "yarn");
        assert!(ignored.iter().any(|f| f == "tool.colour"));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_default_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE), false).unwrap();
        assert_eq!(config.tool.command, "yarn");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&dir.path().join("custom.toml"), true).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[output]\nartifact = \"assets.hpp\"\n").unwrap();

        let config = Config::load(&path, false).unwrap();
        assert_eq!(config.output.artifact, "assets.hpp");
        assert_eq!(config.output.namespace, "esp32m");
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[tool]\ncommand = \"\"\n[output]\ninit_fn = \"9init\"\n").unwrap();

        match Config::load(&path, true).unwrap_err() {
            ConfigError::Validation(diag) => assert_eq!(diag.errors().len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
