//! Dimension resolution: from declared physical size and view bounds to a
//! single pixels-per-inch value.
//!
//! The resolver derives a resolution independently from each axis and
//! refuses to pick one when they disagree, so documents with non-square
//! pixels are rejected rather than silently distorted.
//!
//! # Example
//!
//! ```
//! use svg2laser::dimension::resolve;
//!
//! let scale = resolve("457.2mm", "457.2mm", "0 0 5400 5400")?;
//! assert_eq!(scale.pixels_per_inch, 300);
//! # Ok::<(), svg2laser::Error>(())
//! ```

mod bounds;
mod length;

pub use bounds::ViewBounds;
pub use length::{DimensionField, Length, LengthUnit, MILLIMETERS_PER_INCH};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum allowed disagreement between the two axis resolutions.
pub const RESOLUTION_TOLERANCE: f64 = 1e-3;

/// Declared physical size plus internal coordinate bounds of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentDimensions {
    pub width: Length,
    pub height: Length,
    pub view_bounds: ViewBounds,
}

impl DocumentDimensions {
    /// Parse the three raw root attributes.
    ///
    /// Bounds are validated first, then width, then height; the first
    /// failure is returned.
    pub fn parse(width: &str, height: &str, view_box: &str) -> Result<Self> {
        let view_bounds = ViewBounds::parse(view_box)?;
        let width = Length::parse(DimensionField::Width, width)?;
        let height = Length::parse(DimensionField::Height, height)?;
        Ok(Self {
            width,
            height,
            view_bounds,
        })
    }

    /// Resolve the document's pixels-per-inch.
    pub fn resolve(&self) -> Result<ResolvedScale> {
        let width_ppi = self.view_bounds.width_extent() as f64 / self.width.to_inches();
        let height_ppi = self.view_bounds.height_extent() as f64 / self.height.to_inches();

        // A length small enough to underflow in inches gives an infinite ratio.
        if !width_ppi.is_finite() {
            return Err(Error::InvalidLength {
                field: DimensionField::Width,
                value: self.width.to_string(),
            });
        }
        if !height_ppi.is_finite() {
            return Err(Error::InvalidLength {
                field: DimensionField::Height,
                value: self.height.to_string(),
            });
        }

        let difference = (width_ppi - height_ppi).abs();
        if !(difference <= RESOLUTION_TOLERANCE) {
            return Err(Error::AnisotropicResolution {
                width_ppi,
                height_ppi,
                difference,
            });
        }

        Ok(ResolvedScale {
            // Truncation toward zero, not rounding.
            pixels_per_inch: width_ppi as u64,
            width_ppi,
            height_ppi,
        })
    }
}

/// An authoritative resolution for a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScale {
    /// Width-based resolution truncated to an integer
    pub pixels_per_inch: u64,
    /// Resolution computed from the horizontal axis
    pub width_ppi: f64,
    /// Resolution computed from the vertical axis
    pub height_ppi: f64,
}

impl ResolvedScale {
    /// Convert a physical length to document units at this resolution.
    pub fn to_document_units(&self, length: Length) -> f64 {
        length.to_inches() * self.pixels_per_inch as f64
    }
}

/// Resolve pixels-per-inch from raw `width`, `height` and `viewBox` strings.
pub fn resolve(width: &str, height: &str, view_box: &str) -> Result<ResolvedScale> {
    let dims = DocumentDimensions::parse(width, height, view_box)?;
    dims.resolve()
}
