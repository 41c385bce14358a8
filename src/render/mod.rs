//! Rendering module for writing document trees back to markup and
//! reports to JSON.

mod json;
mod xml;

pub use json::{to_json, JsonFormat};
pub use xml::{to_xml, to_xml_bytes, XML_HEADER};
