//! Document tree and predicate search.

use super::element::{Element, Node, Tag};
use crate::dimension::{resolve, ResolvedScale};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A parsed document: exclusive owner of every element below the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTree {
    root: Element,
}

impl DocumentTree {
    /// Wrap a root element.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse raw document bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        crate::parser::parse_document(data)
    }

    /// The root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the root element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Consume the tree, returning its root.
    pub fn into_root(self) -> Element {
        self.root
    }

    /// Number of elements in the tree, root included.
    pub fn element_count(&self) -> usize {
        self.search(|_| true).len()
    }

    /// Raw dimension attributes declared on the root.
    pub fn declared_dimensions(&self) -> DeclaredDimensions {
        let get = |name: &str| {
            self.root
                .attribute(name)
                .map(|v| v.into_owned())
                .unwrap_or_default()
        };
        DeclaredDimensions {
            width: get("width"),
            height: get("height"),
            view_box: get("viewBox"),
        }
    }

    /// Find every element matching `predicate`, in pre-order.
    pub fn search<F>(&self, mut predicate: F) -> Vec<&Element>
    where
        F: FnMut(&Element) -> bool,
    {
        let mut found = Vec::new();
        collect_elements(&self.root, &mut predicate, &mut found);
        found
    }

    /// Find every start tag matching `predicate`, in pre-order, as mutable
    /// handles into this tree.
    pub fn search_mut<F>(&mut self, mut predicate: F) -> MatchSet<'_>
    where
        F: FnMut(&Tag) -> bool,
    {
        let mut tags = Vec::new();
        collect_tags(&mut self.root, &mut predicate, &mut tags);
        MatchSet { tags }
    }

    /// Serialize with the standard XML declaration header.
    pub fn to_xml(&self) -> String {
        crate::render::to_xml(self)
    }
}

fn collect_elements<'a, F>(element: &'a Element, predicate: &mut F, out: &mut Vec<&'a Element>)
where
    F: FnMut(&Element) -> bool,
{
    if predicate(element) {
        out.push(element);
    }
    for child in element.child_elements() {
        collect_elements(child, predicate, out);
    }
}

fn collect_tags<'a, F>(element: &'a mut Element, predicate: &mut F, out: &mut Vec<&'a mut Tag>)
where
    F: FnMut(&Tag) -> bool,
{
    let (tag, children) = element.parts_mut();
    if predicate(tag) {
        out.push(tag);
    }
    for child in children.iter_mut() {
        if let Node::Element(child) = child {
            collect_tags(child, predicate, out);
        }
    }
}

/// Start tags selected by [`DocumentTree::search_mut`].
///
/// Each entry borrows directly into the tree, so edits made through the
/// set are the tree's own state. The set cannot outlive the tree.
#[derive(Debug)]
pub struct MatchSet<'a> {
    tags: Vec<&'a mut Tag>,
}

impl<'a> MatchSet<'a> {
    /// Number of matched elements.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Matched tags in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().map(|t| &**t)
    }

    /// Overwrite an attribute, matched by local name, on every element in the set.
    ///
    /// Returns the number of elements changed.
    pub fn set_local_attribute(&mut self, local_name: &str, value: &str) -> usize {
        let mut changed = 0;
        for tag in self.tags.iter_mut() {
            if tag.set_local_attribute(local_name, value) > 0 {
                changed += 1;
            }
        }
        changed
    }
}

impl<'a> IntoIterator for MatchSet<'a> {
    type Item = &'a mut Tag;
    type IntoIter = std::vec::IntoIter<&'a mut Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}

/// Raw `width`, `height` and `viewBox` values of a root element; empty when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDimensions {
    pub width: String,
    pub height: String,
    pub view_box: String,
}

impl DeclaredDimensions {
    /// Resolve these values to a pixels-per-inch scale.
    pub fn resolve(&self) -> Result<ResolvedScale> {
        resolve(&self.width, &self.height, &self.view_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DocumentTree {
        // first
        // ├── second_1
        // │   ├── third_1_1
        // │   ├── third_1_2
        // │   └── third_1_3
        // └── second_2
        //     └── third
        let root = Element::new("first")
            .with_child(
                Element::new("second_1")
                    .with_child(Element::new("third_1_1"))
                    .with_child(Element::new("third_1_2"))
                    .with_child(Element::new("third_1_3")),
            )
            .with_child(Element::new("second_2").with_child(Element::new("third")));
        DocumentTree::new(root)
    }

    #[test]
    fn test_search_is_pre_order() {
        let tree = sample_tree();
        let names: Vec<_> = tree.search(|_| true).iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "first",
                "second_1",
                "third_1_1",
                "third_1_2",
                "third_1_3",
                "second_2",
                "third"
            ]
        );
        assert_eq!(tree.element_count(), 7);
    }

    #[test]
    fn test_search_mut_is_pre_order() {
        let mut tree = sample_tree();
        let matches = tree.search_mut(|tag| tag.name().starts_with("third") || tag.name() == "second_2");
        let names: Vec<_> = matches.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["third_1_1", "third_1_2", "third_1_3", "second_2", "third"]
        );
    }

    #[test]
    fn test_match_set_mutation_is_visible_in_tree() {
        let mut tree = DocumentTree::new(
            Element::new("svg")
                .with_child(Element::new("path").with_attribute("stroke-width", "4"))
                .with_child(Element::new("g").with_child(
                    Element::new("rect").with_attribute("stroke-width", "9"),
                ))
                .with_child(Element::new("circle").with_attribute("fill", "red")),
        );

        let mut matches = tree.search_mut(|tag| tag.has_local_attribute("stroke-width"));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches.set_local_attribute("stroke-width", "0.300"), 2);

        let widths: Vec<_> = tree
            .search(|el| el.attribute("stroke-width").is_some())
            .iter()
            .map(|el| el.attribute("stroke-width").unwrap().into_owned())
            .collect();
        assert_eq!(widths, vec!["0.300", "0.300"]);
        assert_eq!(
            tree.search(|el| el.name() == "circle")[0].attribute("fill").as_deref(),
            Some("red")
        );
    }

    #[test]
    fn test_empty_match_set() {
        let mut tree = sample_tree();
        let matches = tree.search_mut(|tag| tag.has_local_attribute("stroke-width"));
        assert!(matches.is_empty());
    }

    #[test]
    fn test_declared_dimensions_default_to_empty() {
        let tree = DocumentTree::new(Element::new("svg").with_attribute("width", "2in"));
        let dims = tree.declared_dimensions();
        assert_eq!(dims.width, "2in");
        assert_eq!(dims.height, "");
        assert_eq!(dims.view_box, "");
    }

    #[test]
    fn test_declared_dimensions_resolve() {
        let tree = DocumentTree::new(
            Element::new("svg")
                .with_attribute("width", "2in")
                .with_attribute("height", "2in")
                .with_attribute("viewBox", "0 0 600 600"),
        );
        assert_eq!(
            tree.declared_dimensions().resolve().unwrap().pixels_per_inch,
            300
        );
    }
}
