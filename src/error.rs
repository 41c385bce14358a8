//! Error types for svg2laser library.

use crate::dimension::DimensionField;
use std::io;
use thiserror::Error;

/// Result type alias for svg2laser operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while preparing a drawing for the laser.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input markup is malformed.
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// The root element is not the expected document type.
    #[error("root element is not {expected}, it is '{found}'")]
    UnexpectedRoot {
        /// Tag that was required
        expected: String,
        /// Tag that was found
        found: String,
    },

    /// A declared width or height is not a magnitude followed by `in` or `mm`.
    #[error("invalid {field} '{value}'")]
    InvalidLength {
        /// Which root attribute was rejected
        field: DimensionField,
        /// The raw attribute value
        value: String,
    },

    /// The view bounds are not four ordered non-negative integers.
    #[error("invalid viewBox '{0}'")]
    InvalidBounds(String),

    /// Width-based and height-based resolutions disagree.
    #[error(
        "width and height pixels per inch do not match. width: {width_ppi:.6} height: {height_ppi:.6}, difference: {difference:.15}"
    )]
    AnisotropicResolution {
        /// Pixels per inch derived from the horizontal axis
        width_ppi: f64,
        /// Pixels per inch derived from the vertical axis
        height_ppi: f64,
        /// Absolute difference between the two
        difference: f64,
    },

    /// The external converter could not be started or piped.
    #[error("unable to run converter '{program}': {source}")]
    ConverterSpawn {
        /// Executable that was invoked
        program: String,
        /// Underlying process error
        #[source]
        source: io::Error,
    },

    /// The external converter exited with a non-tolerated status.
    #[error("converter '{program}' failed with exit code {}: {stderr}", exit_code_label(.code))]
    ConverterFailed {
        /// Executable that was invoked
        program: String,
        /// Exit code, `None` if terminated by a signal
        code: Option<i32>,
        /// Captured diagnostic output
        stderr: String,
    },

    /// No converter handles the requested output format.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Error while rendering a report.
    #[error("Render error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error was raised by the dimension resolver.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidLength { .. }
                | Error::InvalidBounds(_)
                | Error::AnisotropicResolution { .. }
        )
    }

    /// Whether the error came from the external converter.
    pub fn is_converter_error(&self) -> bool {
        matches!(
            self,
            Error::ConverterSpawn { .. } | Error::ConverterFailed { .. }
        )
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Parse(err.to_string())
    }
}
