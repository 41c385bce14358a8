//! Export of drawings to other formats through external converters.
//!
//! Converters are registered by the export formats they produce. The
//! registry optionally runs the stroke-width rewrite first so the exported
//! file carries laser hairlines.
//!
//! # Example
//!
//! ```no_run
//! use svg2laser::convert::{ConvertOptions, ConverterRegistry};
//! use svg2laser::rewrite::RewriteOptions;
//!
//! fn main() -> svg2laser::Result<()> {
//!     let registry = ConverterRegistry::with_defaults();
//!     let options = ConvertOptions::new()
//!         .with_format("pdf")
//!         .with_rewrite(RewriteOptions::default());
//!
//!     let svg = std::fs::read("drawing.svg")?;
//!     let result = registry.convert(&svg, &options)?;
//!     std::fs::write("drawing.pdf", &result.content)?;
//!     Ok(())
//! }
//! ```

mod inkscape;
mod process;

pub use inkscape::{
    InkscapeConverter, DEFAULT_INKSCAPE_PROGRAM, DEFAULT_TOLERATED_EXIT_CODES, INKSCAPE_PATH_ENV,
};
pub use process::{ExternalProcess, ProcessOutput};

use crate::error::{Error, Result};
use crate::rewrite::{rewrite, RewriteOptions, RewriteReport};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Export format used when none is given.
pub const DEFAULT_FORMAT: &str = "pdf";

/// Options for a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Export format, lowercase without a leading dot
    pub format: String,

    /// Rewrite the drawing before handing it to the converter
    pub rewrite: Option<RewriteOptions>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the export format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into().trim_start_matches('.').to_lowercase();
        self
    }

    /// Rewrite the drawing with these options before converting.
    pub fn with_rewrite(mut self, options: RewriteOptions) -> Self {
        self.rewrite = Some(options);
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            format: DEFAULT_FORMAT.to_string(),
            rewrite: None,
        }
    }
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Converted content
    pub content: Vec<u8>,

    /// Export format produced
    pub format: String,

    /// MIME type of the output
    pub mime_type: &'static str,

    /// Converter diagnostics, usually its stderr
    pub diagnostics: String,

    /// Converter exit code
    pub exit_code: Option<i32>,

    /// Rewrite applied before conversion, if any
    pub report: Option<RewriteReport>,
}

impl ConvertResult {
    /// Create a result for converted content.
    pub fn new(content: Vec<u8>, format: impl Into<String>) -> Self {
        let format = format.into();
        Self {
            content,
            mime_type: mime_type_for(&format),
            format,
            diagnostics: String::new(),
            exit_code: Some(0),
            report: None,
        }
    }

    /// Get content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// MIME type for an export format.
pub fn mime_type_for(format: &str) -> &'static str {
    match format.to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "ps" => "application/postscript",
        "eps" => "application/eps",
        "emf" => "image/emf",
        "wmf" => "image/wmf",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Export format implied by an output path's extension.
pub fn format_from_path(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Trait for drawing converters.
///
/// Implement this trait to add support for another export backend.
pub trait DocumentConverter: Send + Sync {
    /// Export formats this converter produces.
    ///
    /// Formats should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_formats(&self) -> &[&str];

    /// Get the name of this converter.
    fn name(&self) -> &str;

    /// Convert a serialized drawing to `format`.
    fn convert_bytes(&self, input: &[u8], format: &str) -> Result<ConvertResult>;

    /// Check if this converter produces the given format.
    fn supports_format(&self, format: &str) -> bool {
        let format = format.to_lowercase();
        self.supported_formats().iter().any(|f| *f == format)
    }
}

/// Registry for drawing converters.
///
/// The registry maps export formats to converters. A format registered
/// twice is served by the converter registered last.
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn DocumentConverter>>,
    by_name: HashMap<String, Arc<dyn DocumentConverter>>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the Inkscape converter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(InkscapeConverter::from_env()));
        registry
    }

    /// Register a converter for all of its formats.
    pub fn register(&mut self, converter: Arc<dyn DocumentConverter>) {
        for format in converter.supported_formats() {
            self.converters
                .insert(format.to_lowercase(), converter.clone());
        }
        self.by_name
            .insert(converter.name().to_lowercase(), converter);
    }

    /// Get a converter by export format.
    pub fn get_by_format(&self, format: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.converters.get(&format.to_lowercase()).cloned()
    }

    /// Get a converter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentConverter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if a format is supported.
    pub fn supports(&self, format: &str) -> bool {
        self.converters.contains_key(&format.to_lowercase())
    }

    /// Get all supported formats, sorted.
    pub fn supported_formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.converters.keys().map(|s| s.as_str()).collect();
        formats.sort_unstable();
        formats
    }

    /// Convert a serialized drawing, rewriting it first when requested.
    pub fn convert(&self, input: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
        let converter = self
            .get_by_format(&options.format)
            .ok_or_else(|| Error::UnsupportedFormat(options.format.clone()))?;

        let (document, report) = match &options.rewrite {
            Some(rewrite_options) => {
                let rewritten = rewrite(input, rewrite_options)?;
                (rewritten.content, Some(rewritten.report))
            }
            None => (input.to_vec(), None),
        };

        log::info!(
            "converting {} bytes to {} with {}",
            document.len(),
            options.format,
            converter.name()
        );

        let mut result = converter.convert_bytes(&document, &options.format)?;
        result.report = report;
        Ok(result)
    }

    /// Read a drawing from disk and convert it.
    pub fn convert_file(
        &self,
        path: impl AsRef<Path>,
        options: &ConvertOptions,
    ) -> Result<ConvertResult> {
        let input = std::fs::read(path)?;
        self.convert(&input, options)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl DocumentConverter for Echo {
        fn supported_formats(&self) -> &[&str] {
            &["svg", "txt"]
        }

        fn name(&self) -> &str {
            "Echo"
        }

        fn convert_bytes(&self, input: &[u8], format: &str) -> Result<ConvertResult> {
            Ok(ConvertResult::new(input.to_vec(), format))
        }
    }

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_format(".PNG")
            .with_rewrite(RewriteOptions::default());

        assert_eq!(options.format, "png");
        assert_eq!(options.rewrite, Some(RewriteOptions::default()));
        assert_eq!(ConvertOptions::default().format, "pdf");
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for("pdf"), "application/pdf");
        assert_eq!(mime_type_for("PNG"), "image/png");
        assert_eq!(mime_type_for("xyz"), "application/octet-stream");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(format_from_path(Path::new("out/cut.PDF")), Some("pdf".into()));
        assert_eq!(format_from_path(Path::new("cut")), None);
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ConverterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("EPS"));
        assert!(!registry.supports("docx"));
        assert!(registry.get_by_name("inkscape").is_some());
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ConverterRegistry::new();
        registry.register(Arc::new(Echo));
        assert_eq!(registry.supported_formats(), vec!["svg", "txt"]);
        assert_eq!(registry.get_by_format("SVG").unwrap().name(), "Echo");
        assert!(registry.get_by_name("echo").is_some());
    }

    #[test]
    fn test_registry_unsupported_format() {
        let registry = ConverterRegistry::new();
        let err = registry
            .convert(b"<svg/>", &ConvertOptions::new().with_format("pdf"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref f) if f == "pdf"));
    }

    #[test]
    fn test_registry_rewrites_before_converting() {
        let mut registry = ConverterRegistry::new();
        registry.register(Arc::new(Echo));

        let svg = br#"<svg width="2in" height="2in" viewBox="0 0 600 600"><path stroke-width="9"/></svg>"#;
        let options = ConvertOptions::new()
            .with_format("svg")
            .with_rewrite(RewriteOptions::default());
        let result = registry.convert(svg, &options).unwrap();

        let out = String::from_utf8(result.content).unwrap();
        assert!(out.contains(r#"stroke-width="0.300""#));
        assert_eq!(result.report.unwrap().rewritten, 1);
        assert_eq!(result.mime_type, "image/svg+xml");
    }

    #[test]
    fn test_registry_rewrite_failure_stops_conversion() {
        let mut registry = ConverterRegistry::new();
        registry.register(Arc::new(Echo));

        let options = ConvertOptions::new()
            .with_format("svg")
            .with_rewrite(RewriteOptions::default());
        let err = registry.convert(b"<html/>", &options).unwrap_err();
        assert!(matches!(err, Error::UnexpectedRoot { .. }));
    }
}
