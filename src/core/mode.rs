//! Build mode gate: decides whether the external UI build runs.
//!
//! | Mode    | Artifact present | Artifact absent |
//! |---------|------------------|-----------------|
//! | `Full`  | run              | run             |
//! | `Once`  | skip             | run             |
//! | `Never` | skip             | skip            |

use std::fmt;
use std::path::Path;
use std::process::ExitStatus;
use std::str::FromStr;

use super::error::{EmbedError, EmbedResult};
use crate::{debug, log};

/// Policy for invoking the external UI build before packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Always rebuild the UI.
    Full,
    /// Build only when no generated artifact exists yet.
    Once,
    /// Never build; package whatever the output directory holds.
    Never,
}

impl BuildMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Once => "once",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = EmbedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "full" => Ok(Self::Full),
            "1" | "once" => Ok(Self::Once),
            "2" | "never" => Ok(Self::Never),
            _ => Err(EmbedError::UnknownBuildMode(s.to_string())),
        }
    }
}

// ============================================================================
// Decision
// ============================================================================

/// Why the external build was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `Once` mode and the artifact already exists.
    ArtifactPresent,
    /// `Never` mode.
    Disabled,
}

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Run,
    Skip(SkipReason),
}

/// Decide from the mode and the presence of the previously generated artifact.
pub fn decide(mode: BuildMode, artifact: &Path) -> Decision {
    match mode {
        BuildMode::Full => Decision::Run,
        BuildMode::Once if artifact.is_file() => Decision::Skip(SkipReason::ArtifactPresent),
        BuildMode::Once => Decision::Run,
        BuildMode::Never => Decision::Skip(SkipReason::Disabled),
    }
}

// ============================================================================
// Runner seam
// ============================================================================

/// Something that can run the external UI build in a directory.
pub trait BuildRunner {
    /// Human-readable command line, used in error messages.
    fn describe(&self) -> String;

    /// Run the build to completion and return its exit status.
    fn run(&self, working_dir: &Path) -> EmbedResult<ExitStatus>;
}

/// Apply the gate and, when it says so, run the external build.
///
/// A non-zero exit status becomes [`EmbedError::ExternalBuildFailed`],
/// so asset collection never sees the output of a failed build.
pub fn run_gated<R: BuildRunner + ?Sized>(
    mode: BuildMode,
    artifact: &Path,
    runner: &R,
    working_dir: &Path,
) -> EmbedResult<Decision> {
    let decision = decide(mode, artifact);
    match decision {
        Decision::Run => {
            debug!("ui"; "mode `{}`: running `{}`", mode, runner.describe());
            let status = runner.run(working_dir)?;
            if !status.success() {
                return Err(EmbedError::ExternalBuildFailed {
                    command: runner.describe(),
                    status,
                });
            }
        }
        Decision::Skip(SkipReason::ArtifactPresent) => {
            log!("ui"; "skipping build, `{}` already exists", artifact.display());
        }
        Decision::Skip(SkipReason::Disabled) => {
            log!("ui"; "skipping build (mode `{}`)", mode);
        }
    }
    Ok(decision)
}
