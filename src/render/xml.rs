//! XML serialization for document trees.

use crate::model::DocumentTree;

/// Standard one-line XML declaration written before the root element.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Serialize a tree as the standard header followed by the root element.
///
/// Unmodified tags and all character data are written exactly as parsed.
pub fn to_xml(tree: &DocumentTree) -> String {
    let mut out = String::with_capacity(XML_HEADER.len() + 1024);
    out.push_str(XML_HEADER);
    tree.root().write_to(&mut out);
    out
}

/// Serialize a tree to bytes.
pub fn to_xml_bytes(tree: &DocumentTree) -> Vec<u8> {
    to_xml(tree).into_bytes()
}
