//! `[output]` section configuration.
//!
//! Where the embedded assets come from and what the generated header looks like.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dist_dir = "dist"       # Build output, relative to the staged UI directory
//! artifact = "ui.hpp"     # Generated header, written inside dist_dir
//! namespace = "esp32m"
//! init_fn = "initUi"
//! ui_type = "Ui"
//! sort = true             # Sort assets by name within each type group
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use super::is_cpp_identifier;
use crate::config::ConfigDiagnostics;
use crate::manifest::ArtifactStyle;
use crate::utils::mime::AssetType;

/// Generated artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dist_dir: PathBuf,
    pub artifact: String,
    pub namespace: String,
    pub init_fn: String,
    pub ui_type: String,
    pub sort: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let style = ArtifactStyle::default();
        Self {
            dist_dir: PathBuf::from("dist"),
            artifact: "ui.hpp".into(),
            namespace: style.namespace,
            init_fn: style.init_fn,
            ui_type: style.ui_type,
            sort: true,
        }
    }
}

impl OutputConfig {
    /// Names used when rendering the artifact.
    pub fn style(&self) -> ArtifactStyle {
        ArtifactStyle {
            namespace: self.namespace.clone(),
            init_fn: self.init_fn.clone(),
            ui_type: self.ui_type.clone(),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dist_dir.as_os_str().is_empty() {
            diag.error("output.dist_dir", "must not be empty");
        }
        if !is_file_name(&self.artifact) {
            diag.error_with_hint(
                "output.artifact",
                format!("`{}` is not a file name", self.artifact),
                "the artifact is always written inside `dist_dir`",
            );
        } else if let Some(kind) = AssetType::from_path(Path::new(&self.artifact)) {
            diag.error_with_hint(
                "output.artifact",
                format!("`{}` would be collected as a .{} asset", self.artifact, kind.extension()),
                "use a header name such as \"ui.hpp\"",
            );
        }
        if !is_cpp_identifier(&self.namespace, true) {
            diag.error("output.namespace", format!("`{}` is not a C++ namespace", self.namespace));
        }
        if !is_cpp_identifier(&self.init_fn, false) {
            diag.error("output.init_fn", format!("`{}` is not a C++ identifier", self.init_fn));
        }
        if !is_cpp_identifier(&self.ui_type, true) {
            diag.error("output.ui_type", format!("`{}` is not a C++ type name", self.ui_type));
        }
    }
}

/// A single normal path component.
fn is_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
