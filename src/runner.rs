//! External process runner
//!
//! The orchestrator never spawns processes itself; it goes through the
//! [`ProcessRunner`] trait so sweeps can be driven by the real OS
//! ([`SystemRunner`]) or by a scripted double in tests.
//!
//! Every call blocks until the child terminates. There is no timeout: a
//! hung tool blocks the sweep.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::{Error, Result};

/// Where the child's standard output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Collect stdout into memory and return it
    Memory,
    /// Redirect stdout into this file (parent directory must exist)
    File(PathBuf),
}

impl Capture {
    /// Redirect into `path`.
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

/// Outcome of a successful (zero exit status) invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: Option<String>,
}

impl ProcessOutput {
    /// Build an output record.
    #[must_use]
    pub const fn new(exit_code: i32, stdout: Option<String>) -> Self {
        Self { exit_code, stdout }
    }

    /// Exit status reported by the child.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Captured stdout; `None` when it was redirected to a file.
    #[must_use]
    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Consume the record, yielding captured stdout.
    #[must_use]
    pub fn into_stdout(self) -> Option<String> {
        self.stdout
    }
}

/// Narrow interface for invoking an out-of-process tool.
pub trait ProcessRunner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// # Errors
    ///
    /// - `Error::ExecutableNotFound` if `program` cannot be located
    /// - `Error::LaunchFailed` if the OS refuses to start it
    /// - `Error::NonZeroExit` if it exits unsuccessfully
    /// - `Error::Io` if the capture file cannot be created
    fn run(&mut self, program: &str, args: &[String], capture: &Capture) -> Result<ProcessOutput>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String], capture: &Capture) -> Result<ProcessOutput> {
        debug!(program, ?args, ?capture, "spawning external tool");

        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null()).stderr(Stdio::piped());

        match capture {
            Capture::Memory => {
                cmd.stdout(Stdio::piped());
            }
            Capture::File(path) => {
                let file = File::create(path)?;
                cmd.stdout(Stdio::from(file));
            }
        }

        let output = cmd.output().map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::ExecutableNotFound { program: program.to_string() }
            } else {
                Error::LaunchFailed { program: program.to_string(), source }
            }
        })?;

        // Terminated by a signal reports no code
        let code = output.status.code().unwrap_or(-1);
        if !output.status.success() {
            return Err(Error::NonZeroExit {
                program: program.to_string(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = match capture {
            Capture::Memory => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            Capture::File(_) => None,
        };

        Ok(ProcessOutput::new(code, stdout))
    }
}
