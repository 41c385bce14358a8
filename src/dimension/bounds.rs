//! Internal coordinate-space bounds (`viewBox`).

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn bounds_regex() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"^([0-9]+) ([0-9]+) ([0-9]+) ([0-9]+)$").expect("valid bounds regex")
    })
}

/// The four-integer rectangle `min-x min-y max-x max-y` in document units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewBounds {
    pub min_x: u64,
    pub min_y: u64,
    pub max_x: u64,
    pub max_y: u64,
}

impl ViewBounds {
    /// Parse bounds written as four non-negative integers separated by single spaces.
    ///
    /// Extra or missing tokens, attached units, and a max below its min all
    /// fail with [`Error::InvalidBounds`] carrying the raw string.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidBounds(raw.to_string());

        let caps = bounds_regex().captures(raw).ok_or_else(invalid)?;
        let mut values = [0u64; 4];
        for (index, slot) in values.iter_mut().enumerate() {
            *slot = caps
                .get(index + 1)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(invalid)?;
        }
        let [min_x, min_y, max_x, max_y] = values;

        if max_x < min_x || max_y < min_y {
            return Err(invalid());
        }

        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Horizontal extent in document units.
    pub fn width_extent(&self) -> u64 {
        self.max_x - self.min_x
    }

    /// Vertical extent in document units.
    pub fn height_extent(&self) -> u64 {
        self.max_y - self.min_y
    }
}

impl fmt::Display for ViewBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        let bounds = ViewBounds::parse("0 0 5400 5400").unwrap();
        assert_eq!(bounds.width_extent(), 5400);
        assert_eq!(bounds.height_extent(), 5400);
        assert_eq!(bounds.to_string(), "0 0 5400 5400");
    }

    #[test]
    fn test_parse_offset_bounds() {
        let bounds = ViewBounds::parse("100 50 700 650").unwrap();
        assert_eq!(bounds.width_extent(), 600);
        assert_eq!(bounds.height_extent(), 600);
    }

    #[test]
    fn test_rejects_malformed_bounds() {
        for raw in [
            "",
            "0 0 5400",
            "0 0 5400 5400mm",
            "0 0 5400 5400 1",
            "0  0 5400 5400",
            "0,0,5400,5400",
            "-1 0 5400 5400",
            "0 0 5400.5 5400",
            " 0 0 5400 5400",
            "0 0 ٥ 5400",
        ] {
            let err = ViewBounds::parse(raw).unwrap_err();
            assert!(
                matches!(err, Error::InvalidBounds(ref value) if value == raw),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        assert!(ViewBounds::parse("10 0 5 5400").is_err());
        assert!(ViewBounds::parse("0 10 5400 5").is_err());
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(ViewBounds::parse("0 0 99999999999999999999999 1").is_err());
    }
}
