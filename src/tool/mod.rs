//! The package manager that builds the web UI.
//!
//! Discovery, the minimum version check, and the three commands the
//! pipeline runs through it: `install`, `link` and the build script.

mod version;

pub use version::{Version, parse_version};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use crate::config::ToolConfig;
use crate::core::{BuildRunner, CancelToken, EmbedError, EmbedResult};
use crate::utils::exec::{Cmd, FilterRule};
use crate::{debug, log};

const INSTALL_HINT: &str = "https://yarnpkg.com/getting-started/install";

/// Step group markers carry no information once forwarded without a TTY.
static TOOL_FILTER: FilterRule = FilterRule::new(&["➤ YN0000: ┌", "➤ YN0000: └"]);

/// Plain, uncolored output from the tool.
const TOOL_ENV: [(&str, &str); 2] = [
    ("YARN_ENABLE_COLORS", "0"),
    ("YARN_ENABLE_PROGRESS_BARS", "0"),
];

/// A resolved package manager executable.
#[derive(Debug, Clone)]
pub struct Tool {
    name: String,
    program: PathBuf,
    timeout: Option<Duration>,
    cancel: CancelToken,
}

impl Tool {
    /// Resolve the executable from `tool.path` or `PATH`.
    pub fn resolve(config: &ToolConfig, cancel: CancelToken) -> EmbedResult<Self> {
        let name = config.command.clone();
        let program = match &config.path {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                return Err(EmbedError::ToolNotFound {
                    tool: name,
                    hint: format!("`tool.path` points to `{}`, which is not a file", path.display()),
                });
            }
            None => which::which(&name).map_err(|_| EmbedError::ToolNotFound {
                tool: name.clone(),
                hint: INSTALL_HINT.into(),
            })?,
        };

        debug!("ui"; "using {} at {}", name, program.display());
        Ok(Self {
            name,
            program,
            timeout: config.timeout(),
            cancel,
        })
    }

    /// Run `<tool> -v` in `dir` and fail unless it reports at least `min`.
    ///
    /// Empty or unparseable output counts as too low.
    pub fn check_version(&self, dir: &Path, min: &Version) -> EmbedResult<Version> {
        let text = match Cmd::new(&self.program).arg("-v").cwd(dir).envs(TOOL_ENV).run() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim().to_string(),
            Err(e) => format!("{e:#}"),
        };
        let too_low = |found: String| EmbedError::ToolVersionTooLow {
            tool: self.name.clone(),
            required: min.to_string(),
            found,
        };

        let found = parse_version(&text).ok_or_else(|| too_low(text.clone()))?;
        if found < *min {
            return Err(too_low(found.to_string()));
        }
        debug!("ui"; "{} {} (>= {})", self.name, found, min);
        Ok(found)
    }

    /// `<tool> install` in `dir`.
    pub fn install(&self, dir: &Path) -> EmbedResult<()> {
        log!("ui"; "installing dependencies");
        self.stream_checked(["install"], dir)
    }

    /// `<tool> link <target> -A` in `dir`.
    pub fn link(&self, target: &Path, dir: &Path) -> EmbedResult<()> {
        log!("ui"; "linking {}", target.display());
        self.stream_checked([OsStr::new("link"), target.as_os_str(), OsStr::new("-A")], dir)
    }

    fn command<I, S>(&self, args: I, dir: &Path) -> Cmd
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Cmd::new(&self.program)
            .args(args)
            .cwd(dir)
            .envs(TOOL_ENV)
            .filter(&TOOL_FILTER)
            .timeout(self.timeout)
            .cancel(self.cancel.clone())
    }

    fn stream_checked<I, S>(&self, args: I, dir: &Path) -> EmbedResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let cmd = self.command(args, dir);
        let command = cmd.display();
        let status = cmd.stream()?;
        if !status.success() {
            return Err(EmbedError::ExternalBuildFailed { command, status });
        }
        Ok(())
    }
}

/// Whether `<tool> install` is needed before building in `dir`.
pub fn needs_install(dir: &Path) -> bool {
    !dir.join("yarn.lock").exists() || !dir.join("node_modules").exists()
}

/// The UI build script, run through [`Tool`].
pub struct BuildScript<'a> {
    tool: &'a Tool,
    script: &'a str,
}

impl<'a> BuildScript<'a> {
    pub fn new(tool: &'a Tool, script: &'a str) -> Self {
        Self { tool, script }
    }
}

impl BuildRunner for BuildScript<'_> {
    fn describe(&self) -> String {
        format!("{} {}", self.tool.name, self.script)
    }

    fn run(&self, working_dir: &Path) -> EmbedResult<ExitStatus> {
        self.tool.command([self.script], working_dir).stream()
    }
}
