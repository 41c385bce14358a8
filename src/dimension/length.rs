//! Physical lengths declared on the document root.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Millimeters in one inch.
pub const MILLIMETERS_PER_INCH: f64 = 25.4;

/// Physical units accepted for declared lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Inches (`in`)
    #[default]
    Inch,
    /// Millimeters (`mm`)
    Millimeter,
}

impl LengthUnit {
    /// Parse a unit suffix. Only `in` and `mm` are recognized.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "in" => Some(LengthUnit::Inch),
            "mm" => Some(LengthUnit::Millimeter),
            _ => None,
        }
    }

    /// The suffix used when writing a length in this unit.
    pub fn suffix(&self) -> &'static str {
        match self {
            LengthUnit::Inch => "in",
            LengthUnit::Millimeter => "mm",
        }
    }

    /// Convert a magnitude in this unit to inches.
    pub fn to_inches(&self, magnitude: f64) -> f64 {
        match self {
            LengthUnit::Inch => magnitude,
            LengthUnit::Millimeter => magnitude / MILLIMETERS_PER_INCH,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Which declared dimension a length belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionField {
    /// The root `width` attribute
    Width,
    /// The root `height` attribute
    Height,
}

impl fmt::Display for DimensionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionField::Width => f.write_str("width"),
            DimensionField::Height => f.write_str("height"),
        }
    }
}

fn length_regex() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"^([0-9.]+)([a-z]+)$").expect("valid length regex"))
}

/// A magnitude immediately followed by a physical unit, e.g. `457.2mm`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    /// Numeric magnitude in `unit`
    pub magnitude: f64,
    /// Unit of `magnitude`
    pub unit: LengthUnit,
}

impl Length {
    /// Create a length.
    pub fn new(magnitude: f64, unit: LengthUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Create a length in inches.
    pub fn inches(magnitude: f64) -> Self {
        Self::new(magnitude, LengthUnit::Inch)
    }

    /// Create a length in millimeters.
    pub fn millimeters(magnitude: f64) -> Self {
        Self::new(magnitude, LengthUnit::Millimeter)
    }

    /// Parse a declared length such as `2in` or `457.2mm`.
    ///
    /// The magnitude must be a positive decimal and the unit must follow it
    /// directly. Any other unit (`px`, `pt`, `%`, ...) is rejected.
    pub fn parse(field: DimensionField, raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidLength {
            field,
            value: raw.to_string(),
        };

        let caps = length_regex().captures(raw).ok_or_else(invalid)?;
        let unit = caps
            .get(2)
            .and_then(|m| LengthUnit::from_suffix(m.as_str()))
            .ok_or_else(invalid)?;
        let magnitude: f64 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(invalid)?;

        if !magnitude.is_finite() || magnitude <= 0.0 {
            return Err(invalid());
        }

        Ok(Self { magnitude, unit })
    }

    /// This length expressed in inches.
    pub fn to_inches(&self) -> f64 {
        self.unit.to_inches(self.magnitude)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

impl std::str::FromStr for Length {
    type Err = Error;

    /// Parse a free-standing length, reported as a width on failure.
    fn from_str(s: &str) -> Result<Self> {
        Length::parse(DimensionField::Width, s)
    }
}
