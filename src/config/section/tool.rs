//! `[tool]` section configuration.
//!
//! The package manager that builds the web UI.
//!
//! # Example
//!
//! ```toml
//! [tool]
//! command = "yarn"            # Looked up in PATH unless `path` is set
//! path = "/opt/yarn/bin/yarn" # Explicit executable (optional)
//! min_version = "3.2.2"       # Oldest accepted `<command> -v` output
//! build_script = "build"      # Script run as `<command> <build_script>`
//! install = true              # Install dependencies when missing
//! link = true                 # Link the shared UI package before building
//! timeout_secs = 600          # Per-command limit, 0 disables
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigDiagnostics;
use crate::tool::{Version, parse_version};

/// External UI build tool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub command: String,
    pub path: Option<PathBuf>,
    pub min_version: String,
    pub build_script: String,
    pub install: bool,
    pub link: bool,
    pub timeout_secs: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            command: "yarn".into(),
            path: None,
            min_version: "3.2.2".into(),
            build_script: "build".into(),
            install: true,
            link: true,
            timeout_secs: 600,
        }
    }
}

impl ToolConfig {
    /// Per-command timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Minimum accepted version. Only valid after [`validate`](Self::validate).
    pub fn min_version(&self) -> Option<Version> {
        parse_version(&self.min_version)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.command.trim().is_empty() {
            diag.error("tool.command", "must not be empty");
        }
        if self.build_script.trim().is_empty() {
            diag.error("tool.build_script", "must not be empty");
        }
        if self.min_version().is_none() {
            diag.error_with_hint(
                "tool.min_version",
                format!("`{}` is not a version", self.min_version),
                "use dotted numbers, e.g. \"3.2.2\"",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_tool_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.tool.command, "yarn");
        assert_eq!(config.tool.path, None);
        assert_eq!(config.tool.build_script, "build");
        assert!(config.tool.install);
        assert!(config.tool.link);
        assert_eq!(config.tool.timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.tool.min_version(), Some(Version::new(3, 2, 2)));
    }

    #[test]
    fn test_tool_config_custom() {
        let config = test_parse_config(
            "[tool]\ncommand = \"pnpm\"\npath = \"/usr/local/bin/pnpm\"\nmin_version = \"8\"\ntimeout_secs = 0\nlink = false",
        );
        assert_eq!(config.tool.command, "pnpm");
        assert_eq!(config.tool.path, Some(PathBuf::from("/usr/local/bin/pnpm")));
        assert_eq!(config.tool.timeout(), None);
        assert!(!config.tool.link);
        assert!(config.tool.install);
    }

    #[test]
    fn test_tool_config_validation() {
        let mut diag = ConfigDiagnostics::new();
        let tool = ToolConfig {
            command: " ".into(),
            min_version: "latest".into(),
            ..Default::default()
        };
        tool.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, ["tool.command", "tool.min_version"]);
    }
}
