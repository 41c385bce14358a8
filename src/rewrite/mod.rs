//! Attribute rewrite engine.
//!
//! Parses a drawing, resolves its pixels-per-inch from the root's declared
//! size, and overwrites every occurrence of a target attribute with the
//! document-unit equivalent of a physical width. The pipeline fails fast:
//! either the whole rewritten document is produced or an error is returned.
//!
//! # Example
//!
//! ```
//! use svg2laser::rewrite::{rewrite, RewriteOptions};
//!
//! let svg = br#"<svg width="2in" height="2in" viewBox="0 0 600 600"><path stroke-width="4"/></svg>"#;
//! let result = rewrite(svg, &RewriteOptions::default())?;
//! assert_eq!(result.report.value, "0.300");
//! assert!(String::from_utf8(result.content).unwrap().contains(r#"stroke-width="0.300""#));
//! # Ok::<(), svg2laser::Error>(())
//! ```

mod options;

pub use options::{
    RewriteOptions, DEFAULT_ROOT_TAG, DEFAULT_STROKE_WIDTH_IN, DEFAULT_TARGET_ATTRIBUTE,
};

use crate::dimension::{DocumentDimensions, Length, LengthUnit, ResolvedScale};
use crate::error::{Error, Result};
use crate::model::{DeclaredDimensions, DocumentTree};
use crate::render::to_xml_bytes;
use serde::{Deserialize, Serialize};

/// Summary of a completed rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteReport {
    /// Resolution the new value was computed at
    pub scale: ResolvedScale,
    /// Value written to every matching attribute
    pub value: String,
    /// Number of elements whose attribute was overwritten
    pub rewritten: usize,
}

/// A rewritten document and its report.
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// Serialized document
    pub content: Vec<u8>,
    /// What was changed
    pub report: RewriteReport,
}

/// Format an attribute value with exactly three fractional digits.
pub fn format_value(value: f64) -> String {
    format!("{:.3}", value)
}

fn check_root(tree: &DocumentTree, expected: &str) -> Result<()> {
    let root = tree.root();
    if root.local_name() == expected || root.name() == expected {
        return Ok(());
    }
    Err(Error::UnexpectedRoot {
        expected: expected.to_string(),
        found: root.name().to_string(),
    })
}

/// Rewrite a parsed tree in place.
pub fn rewrite_tree(tree: &mut DocumentTree, options: &RewriteOptions) -> Result<RewriteReport> {
    check_root(tree, &options.root_tag)?;

    let scale = tree.declared_dimensions().resolve()?;
    let value = format_value(scale.to_document_units(options.stroke_width));

    let target = options.target_attribute.as_str();
    let mut matches = tree.search_mut(|tag| tag.has_local_attribute(target));
    let rewritten = matches.set_local_attribute(target, &value);

    Ok(RewriteReport {
        scale,
        value,
        rewritten,
    })
}

/// Rewrite a document's target attribute and serialize the result.
pub fn rewrite(document: &[u8], options: &RewriteOptions) -> Result<RewriteResult> {
    let mut tree = DocumentTree::parse(document)?;
    let report = rewrite_tree(&mut tree, options)?;
    Ok(RewriteResult {
        content: to_xml_bytes(&tree),
        report,
    })
}

/// Rewrite `target_attribute` so it represents `desired` physical units.
pub fn rewrite_attribute(
    document: &[u8],
    target_attribute: &str,
    desired: f64,
    unit: LengthUnit,
) -> Result<Vec<u8>> {
    let options = RewriteOptions::new()
        .with_target_attribute(target_attribute)
        .with_stroke_width(Length::new(desired, unit));
    rewrite(document, &options).map(|result| result.content)
}

/// What a rewrite would do, without producing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    /// Qualified name of the root element
    pub root_tag: String,
    /// Raw dimension attributes
    pub declared: DeclaredDimensions,
    /// Parsed dimension attributes
    pub dimensions: DocumentDimensions,
    /// Resolved resolution
    pub scale: ResolvedScale,
    /// Total number of elements
    pub element_count: usize,
    /// Elements carrying the target attribute
    pub matching_elements: usize,
    /// Value a rewrite would write
    pub value: String,
}

/// Parse and resolve a document, reporting what a rewrite would change.
pub fn inspect(document: &[u8], options: &RewriteOptions) -> Result<Inspection> {
    let tree = DocumentTree::parse(document)?;
    check_root(&tree, &options.root_tag)?;

    let declared = tree.declared_dimensions();
    let dimensions = DocumentDimensions::parse(&declared.width, &declared.height, &declared.view_box)?;
    let scale = dimensions.resolve()?;
    let target = options.target_attribute.as_str();

    Ok(Inspection {
        root_tag: tree.root().name().to_string(),
        element_count: tree.element_count(),
        matching_elements: tree
            .search(|el| el.tag().has_local_attribute(target))
            .len(),
        value: format_value(scale.to_document_units(options.stroke_width)),
        declared,
        dimensions,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionField;

    const DOC: &str = r#"<svg width="457.2mm" height="457.2mm" viewBox="0 0 5400 5400"><g stroke-width="2"><path d="M0 0" stroke-width="10.5"/><rect/></g></svg>"#;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.3), "0.300");
        assert_eq!(format_value(3.0), "3.000");
        assert_eq!(format_value(1234.5678), "1234.568");
        assert_eq!(format_value(0.0), "0.000");
    }

    #[test]
    fn test_rewrite_default_hairline() {
        let result = rewrite(DOC.as_bytes(), &RewriteOptions::default()).unwrap();
        assert_eq!(result.report.scale.pixels_per_inch, 300);
        assert_eq!(result.report.value, "0.300");
        assert_eq!(result.report.rewritten, 2);

        let out = String::from_utf8(result.content).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg width=\"457.2mm\" height=\"457.2mm\" viewBox=\"0 0 5400 5400\"><g stroke-width=\"0.300\"><path d=\"M0 0\" stroke-width=\"0.300\"/><rect/></g></svg>"
        );
    }

    #[test]
    fn test_rewrite_attribute_contract() {
        let out = rewrite_attribute(DOC.as_bytes(), "stroke-width", 0.01, LengthUnit::Inch).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches(r#"stroke-width="3.000""#).count(), 2);
    }

    #[test]
    fn test_rewrite_millimeter_width() {
        let options = RewriteOptions::new().with_stroke_width(Length::millimeters(2.54));
        let result = rewrite(DOC.as_bytes(), &options).unwrap();
        assert_eq!(result.report.value, "30.000");
    }

    #[test]
    fn test_rewrite_unexpected_root() {
        let err = rewrite(b"<html><body/></html>", &RewriteOptions::default()).unwrap_err();
        match err {
            Error::UnexpectedRoot { expected, found } => {
                assert_eq!(expected, "svg");
                assert_eq!(found, "html");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unexpected_root_reports_qualified_name() {
        let err = rewrite(b"<x:html xmlns:x=\"urn:x\"/>", &RewriteOptions::default()).unwrap_err();
        match err {
            Error::UnexpectedRoot { found, .. } => assert_eq!(found, "x:html"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_root_match_is_case_sensitive() {
        let err = rewrite(
            br#"<SVG width="2in" height="2in" viewBox="0 0 600 600"/>"#,
            &RewriteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnexpectedRoot { .. }));
    }

    #[test]
    fn test_resolver_errors_propagate_unchanged() {
        let err = rewrite(
            br#"<svg width="2in" height="3in" viewBox="0 0 5400 5400"/>"#,
            &RewriteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::AnisotropicResolution { .. }));

        let err = rewrite(br#"<svg viewBox="0 0 10 10"/>"#, &RewriteOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLength {
                field: DimensionField::Width,
                ref value
            } if value.is_empty()
        ));

        let err = rewrite(br#"<svg width="2in" height="2in"/>"#, &RewriteOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidBounds(ref v) if v.is_empty()));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = rewrite(b"<svg><g></svg>", &RewriteOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_no_matches_still_serializes() {
        let doc = r#"<svg width="2in" height="2in" viewBox="0 0 600 600"><rect/></svg>"#;
        let result = rewrite(doc.as_bytes(), &RewriteOptions::default()).unwrap();
        assert_eq!(result.report.rewritten, 0);
        assert_eq!(
            String::from_utf8(result.content).unwrap(),
            format!("{}{}", crate::render::XML_HEADER, doc)
        );
    }

    #[test]
    fn test_custom_target_attribute() {
        let doc = r#"<svg width="2in" height="2in" viewBox="0 0 600 600"><path r="5" stroke-width="4"/></svg>"#;
        let options = RewriteOptions::new().with_target_attribute("r");
        let result = rewrite(doc.as_bytes(), &options).unwrap();
        let out = String::from_utf8(result.content).unwrap();
        assert!(out.contains(r#"<path r="0.300" stroke-width="4"/>"#));
    }

    #[test]
    fn test_inspect() {
        let info = inspect(DOC.as_bytes(), &RewriteOptions::default()).unwrap();
        assert_eq!(info.root_tag, "svg");
        assert_eq!(info.declared.width, "457.2mm");
        assert_eq!(info.dimensions.view_bounds.width_extent(), 5400);
        assert_eq!(info.scale.pixels_per_inch, 300);
        assert_eq!(info.element_count, 4);
        assert_eq!(info.matching_elements, 2);
        assert_eq!(info.value, "0.300");
    }
}
