//! Pipeline error types.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// EmbedError
// ============================================================================

/// Fatal conditions of an embedding run.
///
/// Every variant aborts the whole run. Skipping the external build
/// (`Once`/`Never`) is not an error and never produces one of these.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("`{tool}` not found, please install it: {hint}")]
    ToolNotFound { tool: String, hint: String },

    #[error("`{tool}` version {required} or later expected, got {found:?}")]
    ToolVersionTooLow {
        tool: String,
        required: String,
        found: String,
    },

    #[error("package not found: `{}`", .0.display())]
    PackageNotFound(PathBuf),

    #[error("invalid package descriptor `{}`", .0.display())]
    InvalidPackageJson(PathBuf, #[source] serde_json::Error),

    #[error("`{command}` failed with {status}")]
    ExternalBuildFailed { command: String, status: ExitStatus },

    #[error("`{command}` did not finish within {}s", .timeout.as_secs())]
    ExternalBuildTimedOut { command: String, timeout: Duration },

    #[error("`{command}` was cancelled")]
    ExternalBuildCancelled { command: String },

    #[error("build output directory not found: `{}`", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("IO error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("unknown build mode `{0}` (expected 0, 1, 2, full, once or never)")]
    UnknownBuildMode(String),

    #[error("`{first}` and `{second}` both map to symbol `{symbol}`")]
    SymbolCollision {
        symbol: String,
        first: String,
        second: String,
    },
}

impl EmbedError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(path.into(), err)
    }
}

/// Shorthand result for pipeline operations.
pub type EmbedResult<T> = Result<T, EmbedError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_display() {
        let err = EmbedError::io("dist/app.js.gz", Error::new(ErrorKind::PermissionDenied, "denied"));
        let display = format!("{err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("dist/app.js.gz"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_collision_display() {
        let err = EmbedError::SymbolCollision {
            symbol: "app_js".into(),
            first: "app.js".into(),
            second: "app-js".into(),
        };
        let display = format!("{err}");
        assert!(display.contains("app.js"));
        assert!(display.contains("app-js"));
        assert!(display.contains("app_js"));
    }

    #[test]
    fn test_tool_not_found_has_hint() {
        let err = EmbedError::ToolNotFound {
            tool: "yarn".into(),
            hint: "https://yarnpkg.com/getting-started/install".into(),
        };
        assert!(format!("{err}").contains("yarnpkg.com"));
    }
}
