//! # svg2laser
//!
//! Prepare SVG drawings for laser cutters and engravers.
//!
//! Laser drivers treat a path as a vector cut only when its stroke is a
//! hairline, a physical width of about a thousandth of an inch. Drawing
//! tools store stroke widths in document units, so the right value depends
//! on the document's resolution. This library infers that resolution from
//! the root element's `width`, `height` and `viewBox` and rewrites every
//! `stroke-width` to the hairline equivalent.
//!
//! ## Quick Start
//!
//! ```no_run
//! use svg2laser::{rewrite_file, RewriteOptions};
//!
//! fn main() -> svg2laser::Result<()> {
//!     let result = rewrite_file("drawing.svg", &RewriteOptions::default())?;
//!     println!("{} px/in", result.report.scale.pixels_per_inch);
//!     std::fs::write("drawing-for-laser.svg", &result.content)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Resolution inference**: mm or inch sizes against view bounds
//! - **Anisotropy detection**: refuses documents with non-square pixels
//! - **Byte-faithful output**: only rewritten tags change
//! - **Export**: optional PDF/PNG/EPS output through Inkscape

pub mod convert;
pub mod dimension;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod rewrite;

// Re-export commonly used types
pub use convert::{
    ConvertOptions, ConvertResult, ConverterRegistry, DocumentConverter, InkscapeConverter,
};
pub use dimension::{
    DimensionField, DocumentDimensions, Length, LengthUnit, ResolvedScale, ViewBounds,
};
pub use error::{Error, Result};
pub use model::{Attribute, DeclaredDimensions, DocumentTree, Element, MatchSet, Node, Tag};
pub use parser::parse_document;
pub use render::{to_json, to_xml, JsonFormat};
pub use rewrite::{
    inspect, rewrite, rewrite_attribute, rewrite_tree, Inspection, RewriteOptions, RewriteReport,
    RewriteResult,
};

use std::io::Read;
use std::path::Path;

/// Resolve pixels-per-inch from raw root attribute values.
///
/// # Example
///
/// ```
/// let scale = svg2laser::resolve("2in", "2in", "0 0 600 600")?;
/// assert_eq!(scale.pixels_per_inch, 300);
/// # Ok::<(), svg2laser::Error>(())
/// ```
pub fn resolve(width: &str, height: &str, view_box: &str) -> Result<ResolvedScale> {
    let scale = dimension::resolve(width, height, view_box)?;
    log::debug!(
        "resolved {} x {} over [{}] to {} px/in",
        width,
        height,
        view_box,
        scale.pixels_per_inch
    );
    Ok(scale)
}

/// Parse an SVG file into a document tree.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<DocumentTree> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let tree = DocumentTree::parse(&data)?;
    log::debug!(
        "parsed {}: <{}> with {} elements",
        path.display(),
        tree.root().name(),
        tree.element_count()
    );
    Ok(tree)
}

/// Rewrite an SVG file.
///
/// The file is not modified; the rewritten document is returned.
///
/// # Example
///
/// ```no_run
/// use svg2laser::{rewrite_file, Length, RewriteOptions};
///
/// let options = RewriteOptions::new().with_stroke_width(Length::millimeters(0.1));
/// let result = rewrite_file("drawing.svg", &options).unwrap();
/// println!("rewrote {} elements", result.report.rewritten);
/// ```
pub fn rewrite_file<P: AsRef<Path>>(path: P, options: &RewriteOptions) -> Result<RewriteResult> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    log::debug!("rewriting {} ({} bytes)", path.display(), data.len());
    logged_rewrite(&data, options)
}

/// Rewrite an SVG read from any reader.
pub fn rewrite_reader<R: Read>(mut reader: R, options: &RewriteOptions) -> Result<RewriteResult> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    logged_rewrite(&data, options)
}

/// Inspect an SVG file without rewriting it.
pub fn inspect_file<P: AsRef<Path>>(path: P, options: &RewriteOptions) -> Result<Inspection> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let info = inspect(&data, options)?;
    log::debug!(
        "{}: {} elements, {} carry {}, {} px/in",
        path.display(),
        info.element_count,
        info.matching_elements,
        options.target_attribute,
        info.scale.pixels_per_inch
    );
    Ok(info)
}

fn logged_rewrite(data: &[u8], options: &RewriteOptions) -> Result<RewriteResult> {
    let result = rewrite(data, options)?;
    let report = &result.report;
    log::debug!(
        "rewrote {} on {} elements to {} ({} at {} px/in)",
        options.target_attribute,
        report.rewritten,
        report.value,
        options.stroke_width,
        report.scale.pixels_per_inch
    );
    Ok(result)
}

/// Builder for rewriting and exporting drawings.
///
/// # Example
///
/// ```no_run
/// use svg2laser::Svg2Laser;
///
/// let pdf = Svg2Laser::new()
///     .with_stroke_width_mm(0.025)
///     .with_format("pdf")
///     .convert_file("drawing.svg")?;
/// std::fs::write("drawing.pdf", &pdf.content)?;
/// # Ok::<(), svg2laser::Error>(())
/// ```
pub struct Svg2Laser {
    rewrite_options: RewriteOptions,
    convert_options: ConvertOptions,
    converter: InkscapeConverter,
}

impl Svg2Laser {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            rewrite_options: RewriteOptions::default(),
            convert_options: ConvertOptions::default(),
            converter: InkscapeConverter::from_env(),
        }
    }

    /// Set the physical stroke width.
    pub fn with_stroke_width(mut self, width: Length) -> Self {
        self.rewrite_options = self.rewrite_options.with_stroke_width(width);
        self
    }

    /// Set the physical stroke width in inches.
    pub fn with_stroke_width_in(self, inches: f64) -> Self {
        self.with_stroke_width(Length::inches(inches))
    }

    /// Set the physical stroke width in millimeters.
    pub fn with_stroke_width_mm(self, millimeters: f64) -> Self {
        self.with_stroke_width(Length::millimeters(millimeters))
    }

    /// Set the attribute to rewrite.
    pub fn with_target_attribute(mut self, name: impl Into<String>) -> Self {
        self.rewrite_options = self.rewrite_options.with_target_attribute(name);
        self
    }

    /// Set the required root tag.
    pub fn with_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.rewrite_options = self.rewrite_options.with_root_tag(tag);
        self
    }

    /// Use a specific Inkscape executable for export.
    pub fn with_inkscape(mut self, program: impl Into<String>) -> Self {
        self.converter = self.converter.with_program(program);
        self
    }

    /// Set the export format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.convert_options = self.convert_options.with_format(format);
        self
    }

    /// Rewrite options the builder has accumulated.
    pub fn rewrite_options(&self) -> &RewriteOptions {
        &self.rewrite_options
    }

    /// Rewrite a document held in memory.
    pub fn rewrite_bytes(&self, data: &[u8]) -> Result<RewriteResult> {
        logged_rewrite(data, &self.rewrite_options)
    }

    /// Rewrite a document on disk.
    pub fn rewrite_file<P: AsRef<Path>>(&self, path: P) -> Result<RewriteResult> {
        rewrite_file(path, &self.rewrite_options)
    }

    /// Inspect a document held in memory.
    pub fn inspect_bytes(&self, data: &[u8]) -> Result<Inspection> {
        inspect(data, &self.rewrite_options)
    }

    /// Rewrite a document and export it with the configured converter.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        let mut registry = ConverterRegistry::new();
        registry.register(std::sync::Arc::new(self.converter.clone()));
        let options = self
            .convert_options
            .clone()
            .with_rewrite(self.rewrite_options.clone());
        registry.convert(data, &options)
    }

    /// Rewrite a file and export it with the configured converter.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let data = std::fs::read(path)?;
        self.convert_bytes(&data)
    }
}

impl Default for Svg2Laser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<svg width="2in" height="2in" viewBox="0 0 600 600"><path stroke-width="7"/></svg>"#;

    #[test]
    fn test_svg2laser_builder() {
        let builder = Svg2Laser::new()
            .with_stroke_width_mm(0.0254)
            .with_target_attribute("r")
            .with_root_tag("svg:svg");

        let options = builder.rewrite_options();
        assert_eq!(options.stroke_width, Length::millimeters(0.0254));
        assert_eq!(options.target_attribute, "r");
        assert_eq!(options.root_tag, "svg:svg");
    }

    #[test]
    fn test_svg2laser_builder_default() {
        let builder = Svg2Laser::default();
        assert_eq!(builder.rewrite_options(), &RewriteOptions::default());
        assert_eq!(builder.convert_options.format, "pdf");
    }

    #[test]
    fn test_svg2laser_rewrite_bytes() {
        let result = Svg2Laser::new()
            .with_stroke_width_in(0.01)
            .rewrite_bytes(DOC.as_bytes())
            .unwrap();
        assert_eq!(result.report.value, "3.000");
        assert_eq!(result.report.rewritten, 1);
    }

    #[test]
    fn test_svg2laser_inspect_bytes() {
        let info = Svg2Laser::new().inspect_bytes(DOC.as_bytes()).unwrap();
        assert_eq!(info.scale.pixels_per_inch, 300);
        assert_eq!(info.matching_elements, 1);
    }

    #[test]
    fn test_svg2laser_convert_unsupported_format() {
        let err = Svg2Laser::new()
            .with_format("docx")
            .convert_bytes(DOC.as_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_svg2laser_convert_rewrites_first() {
        // The rewrite fails before any converter is launched.
        let err = Svg2Laser::new()
            .with_inkscape("svg2laser-missing-inkscape")
            .convert_bytes(b"<html/>")
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_resolve_reexport() {
        let scale = resolve("457.2mm", "457.2mm", "0 0 5400 5400").unwrap();
        assert_eq!(scale.pixels_per_inch, 300);
    }

    #[test]
    fn test_rewrite_reader() {
        let result = rewrite_reader(DOC.as_bytes(), &RewriteOptions::default()).unwrap();
        assert_eq!(result.report.value, "0.300");
    }

    #[test]
    fn test_rewrite_file_missing() {
        let err = rewrite_file("/nonexistent/drawing.svg", &RewriteOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_parse_bytes_empty_data() {
        assert!(parse_document(b"").is_err());
    }
}
