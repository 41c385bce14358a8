//! Document model: an owned, order-preserving element tree.
//!
//! Parsed trees remember the source text of every tag, text run and comment
//! so that serialization reproduces untouched markup exactly.

mod element;
mod tree;

pub use element::{Attribute, Element, Node, Tag};
pub use tree::{DeclaredDimensions, DocumentTree, MatchSet};
