use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use anyhow::Context;
use dyno_counters::OutputSource;

use crate::types::HarnessResult;

/// An external process launch with its arguments resolved ahead of time.
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run the process to completion and capture its output.
    ///
    /// Blocks until the process exits, with no timeout. A benchmark that hangs holds the sweep
    /// with it. A process that cannot be launched at all is an error; a process that launches and
    /// exits with a failure status is reported through [RunOutput::succeeded].
    pub fn run(&self) -> HarnessResult<RunOutput> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| format!("Failed to execute '{self}'"))?;

        Ok(RunOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// The captured output of a completed process.
pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Whether the process exited with a zero status.
    pub fn succeeded(&self) -> bool {
        self.status.success()
    }

    /// The captured text of the given stream.
    pub fn stream(&self, source: OutputSource) -> &str {
        match source {
            OutputSource::Stdout => &self.stdout,
            OutputSource::Stderr => &self.stderr,
        }
    }
}
