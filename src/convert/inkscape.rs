//! Inkscape-backed converter.

use super::{mime_type_for, ConvertResult, DocumentConverter, ExternalProcess};
use crate::error::{Error, Result};

/// Environment variable overriding the Inkscape executable.
pub const INKSCAPE_PATH_ENV: &str = "SVG2LASER_INKSCAPE_PATH";

/// Executable used when no override is set.
pub const DEFAULT_INKSCAPE_PROGRAM: &str = "inkscape";

/// Exit codes Inkscape may return after a usable export.
pub const DEFAULT_TOLERATED_EXIT_CODES: &[i32] = &[3];

const EXPORT_TYPES: &[&str] = &["pdf", "png", "ps", "eps", "emf", "wmf", "svg"];

/// Converts drawings by piping them through `inkscape --pipe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkscapeConverter {
    program: String,
    tolerated_exit_codes: Vec<i32>,
}

impl InkscapeConverter {
    /// Create a converter invoking `inkscape` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: DEFAULT_INKSCAPE_PROGRAM.to_string(),
            tolerated_exit_codes: DEFAULT_TOLERATED_EXIT_CODES.to_vec(),
        }
    }

    /// Create a converter honoring `SVG2LASER_INKSCAPE_PATH`.
    pub fn from_env() -> Self {
        match std::env::var(INKSCAPE_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::new().with_program(path),
            _ => Self::new(),
        }
    }

    /// Use a specific executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Replace the set of tolerated non-zero exit codes.
    pub fn with_tolerated_exit_codes(mut self, codes: impl Into<Vec<i32>>) -> Self {
        self.tolerated_exit_codes = codes.into();
        self
    }

    /// Executable this converter runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The process invocation for an export type.
    pub fn command(&self, export_type: &str) -> ExternalProcess {
        ExternalProcess::new(self.program.clone())
            .args([
                "--pipe".to_string(),
                "--export-filename=-".to_string(),
                format!("--export-type={export_type}"),
            ])
            .with_tolerated_exit_codes(self.tolerated_exit_codes.clone())
    }
}

impl Default for InkscapeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for InkscapeConverter {
    fn supported_formats(&self) -> &[&str] {
        EXPORT_TYPES
    }

    fn name(&self) -> &str {
        "inkscape"
    }

    fn convert_bytes(&self, input: &[u8], format: &str) -> Result<ConvertResult> {
        let format = format.to_lowercase();
        if !self.supports_format(&format) {
            return Err(Error::UnsupportedFormat(format));
        }

        let output = self.command(&format).run(input)?;
        Ok(ConvertResult {
            mime_type: mime_type_for(&format),
            diagnostics: output.stderr_text(),
            exit_code: output.exit_code,
            content: output.stdout,
            format,
            report: None,
        })
    }
}
