//! JSON rendering for reports.

use crate::error::{Error, Result};
use serde::Serialize;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a report to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::{inspect, RewriteOptions};

    const DOC: &[u8] =
        br#"<svg width="2in" height="2in" viewBox="0 0 600 600"><path stroke-width="1"/></svg>"#;

    #[test]
    fn test_to_json_pretty() {
        let info = inspect(DOC, &RewriteOptions::default()).unwrap();
        let json = to_json(&info, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"pixels_per_inch\": 300"));
        assert!(json.contains("\"unit\": \"inch\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let info = inspect(DOC, &RewriteOptions::default()).unwrap();
        let json = to_json(&info, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"value\":\"0.300\""));
    }
}
