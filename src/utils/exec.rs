//! External command execution utilities.
//!
//! Provides a Builder-based API for running external commands, either
//! capturing their output ([`Cmd::run`]) or streaming it live to our own
//! stdout/stderr ([`Cmd::stream`]).
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Captured output
//! let output = Cmd::new(&yarn).arg("-v").cwd(dir).run()?;
//!
//! // Streamed output with timeout and cancellation
//! let status = Cmd::new(&yarn)
//!     .arg("build")
//!     .cwd(dir)
//!     .timeout(Some(Duration::from_secs(600)))
//!     .cancel(token.clone())
//!     .stream()?;
//! ```

use crate::core::{CancelToken, EmbedError, EmbedResult};
use crate::debug;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    io::{self, BufRead, BufReader, Read, Write},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Output, Stdio},
    sync::{
        OnceLock,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

/// How often a streamed child is polled for exit, timeout and cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// Builder API
// ============================================================================

/// Command builder for external process execution.
///
/// Provides a fluent API for configuring and running external commands.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    filter: Option<&'static FilterRule>,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Set output filter for forwarded/logged lines.
    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Kill the child if it runs longer than `timeout` (streaming only).
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Kill the child once `token` is cancelled (streaming only).
    pub fn cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Command line for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().to_string()));
        parts.join(" ")
    }

    /// Get the program name for error messages.
    fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(&self.program)
            .to_string_lossy()
            .to_string()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).envs(self.envs.iter().cloned());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Execute the command and capture its output.
    ///
    /// Fails if the command cannot be spawned or exits non-zero.
    pub fn run(self) -> Result<Output> {
        let filter = self.filter.unwrap_or(&EMPTY_FILTER);
        let name = self.program_name();

        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !output.status.success() {
            anyhow::bail!(format_error(&name, &output, filter));
        }
        Ok(output)
    }

    /// Execute the command, forwarding its output as it is produced.
    ///
    /// stdout and stderr are drained by two independent reader threads so a
    /// full pipe on one stream never stalls the other. Every line is cleaned
    /// of ANSI sequences and control characters before being written to our
    /// own stdout/stderr respectively. Both readers finish before the exit
    /// status is returned.
    ///
    /// The timeout and cancel token cover the whole call, including the
    /// wait for the pipes to close after the child has exited. A background
    /// process that keeps them open therefore ends in a timeout or
    /// cancellation error, and its reader threads are left detached.
    ///
    /// The exit status is returned as-is; callers decide what non-zero means.
    pub fn stream(self) -> EmbedResult<ExitStatus> {
        let filter = self.filter.unwrap_or(&EMPTY_FILTER);
        let display = self.display();

        let mut child = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EmbedError::io(PathBuf::from(&self.program), e))?;

        let limits = Limits {
            display: &display,
            started: Instant::now(),
            timeout: self.timeout,
            cancel: self.cancel.as_ref(),
        };

        let (done_tx, done_rx) = mpsc::channel();
        let mut readers = 0;
        if let Some(pipe) = child.stdout.take() {
            spawn_forwarder(pipe, io::stdout, filter, done_tx.clone());
            readers += 1;
        }
        if let Some(pipe) = child.stderr.take() {
            spawn_forwarder(pipe, io::stderr, filter, done_tx.clone());
            readers += 1;
        }
        drop(done_tx);

        let status = wait_child(&mut child, &limits)?;
        wait_readers(&done_rx, readers, &limits)?;
        Ok(status)
    }
}

/// Timeout and cancellation shared by every wait inside one [`Cmd::stream`].
struct Limits<'a> {
    display: &'a str,
    started: Instant,
    timeout: Option<Duration>,
    cancel: Option<&'a CancelToken>,
}

impl Limits<'_> {
    /// The error to stop with, if the budget is spent or the token cancelled.
    fn exceeded(&self) -> Option<EmbedError> {
        if self.cancel.is_some_and(CancelToken::is_cancelled) {
            return Some(EmbedError::ExternalBuildCancelled {
                command: self.display.to_string(),
            });
        }
        let timeout = self.timeout?;
        (self.started.elapsed() >= timeout).then(|| EmbedError::ExternalBuildTimedOut {
            command: self.display.to_string(),
            timeout,
        })
    }

    /// Next poll slice, shortened so the deadline is never overshot.
    fn slice(&self) -> Duration {
        match self.timeout {
            Some(timeout) => POLL_INTERVAL.min(timeout.saturating_sub(self.started.elapsed())),
            None => POLL_INTERVAL,
        }
    }
}

/// Poll the child until it exits, times out or is cancelled.
///
/// On timeout or cancellation the child is killed and reaped.
fn wait_child(child: &mut Child, limits: &Limits<'_>) -> EmbedResult<ExitStatus> {
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| EmbedError::io(limits.display, e))?
        {
            return Ok(status);
        }

        if let Some(err) = limits.exceeded() {
            kill_child(child);
            return Err(err);
        }

        thread::sleep(limits.slice());
    }
}

/// Wait for `readers` forwarders to report on `done`.
///
/// Grandchildren can hold the pipes open after the child exits, so this
/// wait is bounded by the same limits. Readers still running when they
/// hit are left detached.
fn wait_readers(
    done: &Receiver<io::Result<usize>>,
    mut readers: usize,
    limits: &Limits<'_>,
) -> EmbedResult<()> {
    while readers > 0 {
        if let Some(err) = limits.exceeded() {
            debug!("exec"; "{} output reader(s) for `{}` left running", readers, limits.display);
            return Err(err);
        }

        match done.recv_timeout(limits.slice()) {
            Ok(Ok(lines)) => {
                debug!("exec"; "forwarded {} line(s) from `{}`", lines, limits.display);
                readers -= 1;
            }
            Ok(Err(e)) => {
                debug!("exec"; "output forwarding for `{}` failed: {}", limits.display, e);
                readers -= 1;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("exec"; "output reader for `{}` panicked", limits.display);
                break;
            }
        }
    }
    Ok(())
}

fn kill_child(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Spawn a thread forwarding `pipe` line by line into a fresh `sink()`.
///
/// The result is sent on `done` once the pipe closes.
fn spawn_forwarder<R, W, F>(
    pipe: R,
    sink: F,
    filter: &'static FilterRule,
    done: Sender<io::Result<usize>>,
) where
    R: Read + Send + 'static,
    W: Write,
    F: FnOnce() -> W + Send + 'static,
{
    thread::spawn(move || {
        let _ = done.send(forward_lines(pipe, sink(), filter));
    });
}

/// Copy lines from `reader` to `sink`, cleaning and filtering each one.
///
/// Returns the number of lines written. Invalid UTF-8 is replaced, not fatal.
pub fn forward_lines<R: Read, W: Write>(
    reader: R,
    mut sink: W,
    filter: &FilterRule,
) -> io::Result<usize> {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut written = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let raw = String::from_utf8_lossy(&buf);
        let line = sanitize_line(&raw);
        if filter.should_skip(line.trim()) {
            continue;
        }
        writeln!(sink, "{line}")?;
        sink.flush()?;
        written += 1;
    }

    Ok(written)
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Filter rule for command output.
///
/// Used to reduce noise by skipping known warnings or irrelevant messages.
pub struct FilterRule {
    /// Prefixes to skip when forwarding output.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    /// Create a new filter rule.
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    /// Check if a line should be skipped.
    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }
}

/// Empty filter (no skipping beyond blank lines).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

// ============================================================================
// Helpers
// ============================================================================

/// Strip ANSI escape sequences (CSI, OSC and two-byte escapes).
fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
            .expect("valid ANSI regex")
    });
    re.replace_all(s, "")
}

/// Make one line of child output safe for a plain-text log consumer.
///
/// Carriage-return redraws keep only their final segment; ANSI sequences
/// and every remaining control character except tab are dropped.
pub fn sanitize_line(line: &str) -> String {
    let line = line.trim_end_matches(['\n', '\r']);
    let line = line
        .rsplit('\r')
        .find(|segment| !segment.trim().is_empty())
        .unwrap_or("");
    strip_ansi(line)
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect()
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output, filter: &FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let error_msg = filter
        .skip_prefixes
        .iter()
        .fold(stderr.trim(), |s, p| s.trim_start_matches(p).trim_start());

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    if !error_msg.is_empty() {
        msg.push_str(&sanitize_line(error_msg));
    }

    let stdout_trimmed = stdout.trim();
    if !stdout_trimmed.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout_trimmed);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================
