//! Element, start-tag and attribute types.

use quick_xml::escape::{escape, unescape};
use std::borrow::Cow;
use std::ops::Range;

/// Strip a namespace prefix from a qualified name.
pub(crate) fn local_part(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// A single attribute, kept exactly as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified name, including any prefix
    name: String,
    /// Value in escaped (markup) form
    raw_value: String,
    /// Byte range of the value inside the owning tag's source text
    span: Option<Range<usize>>,
}

impl Attribute {
    /// Create an attribute from an unescaped value.
    pub fn new(name: impl Into<String>, value: &str) -> Self {
        Self::from_raw(name, escape(value))
    }

    pub(crate) fn from_raw(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: raw_value.into(),
            span: None,
        }
    }

    /// Qualified name, e.g. `inkscape:label`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix, if the name has one.
    pub fn prefix(&self) -> Option<&str> {
        self.name.rsplit_once(':').map(|(prefix, _)| prefix)
    }

    /// Value exactly as it appears in markup.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Value with entity references decoded.
    ///
    /// Undecodable references are returned verbatim.
    pub fn value(&self) -> Cow<'_, str> {
        unescape(&self.raw_value).unwrap_or(Cow::Borrowed(&self.raw_value))
    }
}

fn skip_whitespace(source: &str, pos: usize) -> usize {
    source[pos..]
        .find(|c: char| !c.is_ascii_whitespace())
        .map_or(source.len(), |offset| pos + offset)
}

/// Record where each attribute value sits inside a start tag's text.
///
/// Returns `false`, leaving every span unset, when the text does not
/// line up with the parsed attributes.
fn locate_values(source: &str, name: &str, attributes: &mut [Attribute]) -> bool {
    let mut spans = Vec::with_capacity(attributes.len());
    let Some(rest) = source.strip_prefix('<') else {
        return false;
    };
    if !rest.starts_with(name) {
        return false;
    }
    let mut pos = 1 + name.len();

    for attr in attributes.iter() {
        pos = skip_whitespace(source, pos);
        if !source[pos..].starts_with(attr.name.as_str()) {
            return false;
        }
        pos = skip_whitespace(source, pos + attr.name.len());
        if !source[pos..].starts_with('=') {
            return false;
        }
        pos = skip_whitespace(source, pos + 1);
        let quote = match source[pos..].chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return false,
        };
        let start = pos + 1;
        let Some(len) = source[start..].find(quote) else {
            return false;
        };
        let span = start..start + len;
        if source[span.clone()] != attr.raw_value {
            return false;
        }
        pos = span.end + 1;
        spans.push(span);
    }

    for (attr, span) in attributes.iter_mut().zip(spans) {
        attr.span = Some(span);
    }
    true
}

/// The start tag of an element: name plus ordered attributes.
///
/// A tag parsed from source keeps its original text. Overwriting an
/// existing attribute replaces only that value's bytes; adding an
/// attribute or children to an empty tag regenerates the whole tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
    source: Option<String>,
    modified: bool,
}

impl Tag {
    /// Create a new, empty tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: true,
            source: None,
            modified: false,
        }
    }

    pub(crate) fn from_source(
        name: String,
        mut attributes: Vec<Attribute>,
        self_closing: bool,
        source: String,
    ) -> Self {
        locate_values(&source, &name, &mut attributes);
        Self {
            name,
            attributes,
            self_closing,
            source: Some(source),
            modified: false,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Qualified tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Decoded value of the attribute with this exact qualified name.
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(Attribute::value)
    }

    /// Whether any attribute has this local name, ignoring prefixes.
    pub fn has_local_attribute(&self, local_name: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.local_name() == local_name)
    }

    /// Set the attribute with this exact qualified name, appending it if absent.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let escaped = escape(value);
        match self.attributes.iter().position(|a| a.name == name) {
            Some(index) => self.replace_value(index, &escaped),
            None => {
                self.attributes.push(Attribute::from_raw(name, escaped));
                self.source = None;
                self.modified = true;
            }
        }
    }

    /// Overwrite every attribute whose local name matches, in place.
    ///
    /// Nothing is appended; returns how many attributes were overwritten.
    pub fn set_local_attribute(&mut self, local_name: &str, value: &str) -> usize {
        let escaped = escape(value);
        let mut count = 0;
        for index in 0..self.attributes.len() {
            if self.attributes[index].local_name() == local_name {
                self.replace_value(index, &escaped);
                count += 1;
            }
        }
        count
    }

    /// Replace one escaped value, splicing it into the source text when
    /// its position is known.
    fn replace_value(&mut self, index: usize, escaped: &str) {
        let span = self.attributes[index].span.clone();
        match (self.source.as_mut(), span) {
            (Some(source), Some(span)) => {
                source.replace_range(span.clone(), escaped);
                let end = span.start + escaped.len();
                self.attributes[index].span = Some(span.start..end);
                for later in self.attributes[index + 1..].iter_mut() {
                    if let Some(s) = later.span.as_mut() {
                        *s = (s.start + end - span.end)..(s.end + end - span.end);
                    }
                }
            }
            _ => self.source = None,
        }
        self.attributes[index].raw_value = escaped.to_string();
        self.modified = true;
    }

    /// Whether the element was written as `<name/>`.
    pub fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Whether any attribute changed since the tag was parsed or built.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn open(&mut self) {
        if self.self_closing {
            self.self_closing = false;
            self.source = None;
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        if let Some(source) = &self.source {
            out.push_str(source);
            return;
        }

        out.push('<');
        out.push_str(&self.name);
        for attr in &self.attributes {
            let quote = if attr.raw_value.contains('"') { '\'' } else { '"' };
            out.push(' ');
            out.push_str(&attr.name);
            out.push('=');
            out.push(quote);
            out.push_str(&attr.raw_value);
            out.push(quote);
        }
        out.push_str(if self.self_closing { "/>" } else { ">" });
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, as written in markup
    Text(String),
    /// Comment, including its delimiters
    Comment(String),
    /// CDATA sections, processing instructions and entity references
    Markup(String),
}

impl Node {
    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element: its start tag, ordered children and closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: Tag,
    children: Vec<Node>,
    end: Option<String>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_tag(Tag::new(name))
    }

    /// Create an element from a start tag.
    pub fn from_tag(tag: Tag) -> Self {
        Self {
            tag,
            children: Vec::new(),
            end: None,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.tag.set_attribute(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(Node::Element(child));
        self
    }

    /// Qualified tag name.
    pub fn name(&self) -> &str {
        self.tag.name()
    }

    /// Tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.tag.local_name()
    }

    /// Decoded value of the attribute with this exact qualified name.
    pub fn attribute(&self, name: &str) -> Option<Cow<'_, str>> {
        self.tag.attribute(name)
    }

    /// The start tag.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Mutable access to the start tag.
    pub fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }

    /// All children in document order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Tag, &mut Vec<Node>) {
        (&mut self.tag, &mut self.children)
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Append a child node.
    pub fn push_child(&mut self, node: Node) {
        self.tag.open();
        self.children.push(node);
    }

    pub(crate) fn close_with(&mut self, end_tag: String) {
        self.end = Some(end_tag);
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        self.tag.write_to(out);
        if self.tag.is_self_closing() {
            return;
        }
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_to(out),
                Node::Text(s) | Node::Comment(s) | Node::Markup(s) => out.push_str(s),
            }
        }
        match &self.end {
            Some(end) => out.push_str(end),
            None => {
                out.push_str("</");
                out.push_str(self.tag.name());
                out.push('>');
            }
        }
    }
}
