//! Piped invocation of an external executable.

use crate::error::{Error, Result};
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Everything written to stdout
    pub stdout: Vec<u8>,
    /// Everything written to stderr
    pub stderr: Vec<u8>,
    /// Exit code, `None` if terminated by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Diagnostic output as lossy UTF-8 with surrounding whitespace trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// An executable fed through stdin and read back from stdout.
///
/// Input is written in full and stdin closed before any output is read;
/// stdout and stderr are then drained together until the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProcess {
    program: String,
    args: Vec<String>,
    tolerated_exit_codes: Vec<i32>,
}

impl ExternalProcess {
    /// Create a process description for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            tolerated_exit_codes: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Treat these non-zero exit codes as success.
    pub fn with_tolerated_exit_codes(mut self, codes: impl Into<Vec<i32>>) -> Self {
        self.tolerated_exit_codes = codes.into();
        self
    }

    /// Executable name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the executable.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    fn spawn_error(&self, source: io::Error) -> Error {
        Error::ConverterSpawn {
            program: self.program.clone(),
            source,
        }
    }

    /// Run the process with `input` on stdin.
    pub fn run(&self, input: &[u8]) -> Result<ProcessOutput> {
        log::debug!("running {} {}", self.program, self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input) {
                Ok(()) => {}
                // The process stopped reading; its exit status tells why.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(self.spawn_error(e));
                }
            }
            // stdin is closed here so the process sees end of input.
        }

        let output = child
            .wait_with_output()
            .map_err(|e| self.spawn_error(e))?;
        let result = ProcessOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            exit_code: output.status.code(),
        };

        if output.status.success() {
            return Ok(result);
        }
        match result.exit_code {
            Some(code) if self.tolerated_exit_codes.contains(&code) => {
                log::warn!(
                    "{} exited with tolerated code {}: {}",
                    self.program,
                    code,
                    result.stderr_text()
                );
                Ok(result)
            }
            code => Err(Error::ConverterFailed {
                program: self.program.clone(),
                code,
                stderr: result.stderr_text(),
            }),
        }
    }
}
