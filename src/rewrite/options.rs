//! Rewrite options and configuration.

use crate::dimension::{Length, LengthUnit};

/// Attribute rewritten by default.
pub const DEFAULT_TARGET_ATTRIBUTE: &str = "stroke-width";

/// Root element required by default.
pub const DEFAULT_ROOT_TAG: &str = "svg";

/// Default physical stroke width: a thousandth of an inch, the hairline
/// most laser drivers treat as a vector cut.
pub const DEFAULT_STROKE_WIDTH_IN: f64 = 0.001;

/// Options for rewriting a document.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOptions {
    /// Attribute to overwrite, matched by local name
    pub target_attribute: String,

    /// Physical width the attribute should represent
    pub stroke_width: Length,

    /// Required local name of the root element
    pub root_tag: String,
}

impl RewriteOptions {
    /// Create new rewrite options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute to rewrite.
    pub fn with_target_attribute(mut self, name: impl Into<String>) -> Self {
        self.target_attribute = name.into();
        self
    }

    /// Set the desired physical width.
    pub fn with_stroke_width(mut self, width: Length) -> Self {
        self.stroke_width = width;
        self
    }

    /// Set the desired physical width in inches.
    pub fn with_stroke_width_in(self, inches: f64) -> Self {
        self.with_stroke_width(Length::new(inches, LengthUnit::Inch))
    }

    /// Set the required root tag.
    pub fn with_root_tag(mut self, tag: impl Into<String>) -> Self {
        self.root_tag = tag.into();
        self
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            target_attribute: DEFAULT_TARGET_ATTRIBUTE.to_string(),
            stroke_width: Length::inches(DEFAULT_STROKE_WIDTH_IN),
            root_tag: DEFAULT_ROOT_TAG.to_string(),
        }
    }
}
