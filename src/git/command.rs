//! Bounded-time subprocess execution for the git CLI
//!
//! Every external command goes through [Subprocess] so that a hung `git`
//! (or a `gpg` pinentry waiting on a terminal that never answers) cannot hang
//! the release indefinitely.

use crate::error::{ReleaseTagError, Result};
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Default upper bound for a single git invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured result of a finished subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Returns true if the process exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Non-empty stdout lines with only the line terminator removed
    pub fn lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// First stdout line, for commands that print a single value
    pub fn first_line(&self) -> &str {
        self.stdout.lines().next().unwrap_or("")
    }
}

/// Builder for one subprocess invocation
#[derive(Debug, Clone)]
pub struct Subprocess {
    program: String,
    args: Vec<OsString>,
    timeout: Duration,
}

impl Subprocess {
    /// Create a new invocation of `program`
    pub fn new(program: &str) -> Self {
        Subprocess {
            program: program.to_string(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Invocation of `git` scoped to the repository at `repo`
    pub fn git(repo: &Path) -> Self {
        Subprocess::new("git")
            .arg("-C")
            .arg(repo)
            .args(&["-c", "core.quotePath=false"])
    }

    /// Add a single argument
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| OsString::from(*s)));
        self
    }

    /// Set the timeout for this invocation
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Command line as shown in diagnostics (repository scoping omitted)
    pub fn display(&self) -> String {
        let mut shown = vec![self.program.clone()];
        let mut rest = self.args.iter();
        while let Some(arg) = rest.next() {
            if self.program == "git" && (arg == "-C" || arg == "-c") {
                rest.next();
                continue;
            }
            shown.push(arg.to_string_lossy().into_owned());
        }
        shown.join(" ")
    }

    /// Run to completion and capture output, whatever the exit status
    pub fn run(&self) -> Result<CommandOutput> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ReleaseTagError::ExternalCommand {
                        command: self.display(),
                        code: 127,
                        stderr: format!("{} not found in PATH", self.program),
                    }
                } else {
                    ReleaseTagError::Io(e)
                }
            })?;

        // Drain pipes concurrently so a chatty child can't block on a full pipe
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait_bounded(&mut child, deadline)?;

        // A backgrounded grandchild can keep the pipes open after the child exits
        let output = CommandOutput {
            stdout: self.collect(stdout, deadline)?,
            stderr: self.collect(stderr, deadline)?,
            exit_code: status.code().unwrap_or(-1),
        };

        tracing::debug!(
            command = %self.display(),
            exit_code = output.exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "subprocess finished"
        );

        Ok(output)
    }

    /// Run and turn a non-zero exit status into [ReleaseTagError::ExternalCommand]
    pub fn run_ok(&self) -> Result<CommandOutput> {
        let output = self.run()?;
        if output.success() {
            Ok(output)
        } else {
            Err(ReleaseTagError::ExternalCommand {
                command: self.display(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    fn wait_bounded(&self, child: &mut Child, deadline: Instant) -> Result<ExitStatus> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(command = %self.display(), "subprocess timed out, killed");
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Wait for a drained pipe until `deadline`
    fn collect(&self, pipe: Option<Receiver<Vec<u8>>>, deadline: Instant) -> Result<String> {
        let Some(rx) = pipe else {
            return Ok(String::new());
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(buf) => Ok(String::from_utf8_lossy(&buf).into_owned()),
            Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    command = %self.display(),
                    "subprocess exited but its output is still held open"
                );
                Err(self.timed_out())
            }
        }
    }

    fn timed_out(&self) -> ReleaseTagError {
        ReleaseTagError::Timeout {
            command: self.display(),
            seconds: self.timeout.as_secs(),
        }
    }
}

/// Read a pipe to EOF on a helper thread, handing the bytes over a channel
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<Vec<u8>>> {
    pipe.map(|mut reader| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}
