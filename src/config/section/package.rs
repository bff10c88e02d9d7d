//! `[package]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [package]
//! ui_dir = "web-ui"           # UI project directory inside each root
//! strip_resolutions = true    # Drop `resolutions` from the staged package.json
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigDiagnostics;

/// UI package layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub ui_dir: PathBuf,
    pub strip_resolutions: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            ui_dir: PathBuf::from("web-ui"),
            strip_resolutions: true,
        }
    }
}

impl PackageConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.ui_dir.as_os_str().is_empty() {
            diag.error("package.ui_dir", "must not be empty");
        } else if self.ui_dir.is_absolute() {
            diag.error_with_hint(
                "package.ui_dir",
                "must be relative",
                "it is joined to the package, source and build roots",
            );
        }
    }
}
