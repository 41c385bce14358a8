//! Markup parsing module.

mod xml_parser;

pub use xml_parser::parse_document;
