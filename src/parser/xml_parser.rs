//! Event-driven XML parser producing a [`DocumentTree`].

use crate::error::{Error, Result};
use crate::model::{Attribute, DocumentTree, Element, Node, Tag};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| Error::Parse(format!("{what} is not valid UTF-8: {e}")))
}

fn tag_from_start(start: &BytesStart<'_>, source: &str, self_closing: bool) -> Result<Tag> {
    let name = utf8(start.name().as_ref(), "tag name")?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref(), "attribute name")?;
        let value = utf8(&attr.value, "attribute value")?;
        attributes.push(Attribute::from_raw(key, value));
    }
    Ok(Tag::from_source(
        name,
        attributes,
        self_closing,
        source.to_string(),
    ))
}

/// Builds the element tree from reader events.
struct TreeBuilder {
    open: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            open: Vec::new(),
            root: None,
        }
    }

    fn in_root(&self) -> bool {
        !self.open.is_empty()
    }

    fn ensure_single_root(&self) -> Result<()> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(Error::Parse(
                "document has more than one root element".to_string(),
            ));
        }
        Ok(())
    }

    fn open_element(&mut self, tag: Tag) -> Result<()> {
        self.ensure_single_root()?;
        self.open.push(Element::from_tag(tag));
        Ok(())
    }

    fn close_element(&mut self, end_tag: &str) -> Result<()> {
        let mut element = self
            .open
            .pop()
            .ok_or_else(|| Error::Parse(format!("unexpected closing tag {end_tag}")))?;
        element.close_with(end_tag.to_string());
        self.attach(element)
    }

    fn attach(&mut self, element: Element) -> Result<()> {
        match self.open.last_mut() {
            Some(parent) => parent.push_child(Node::Element(element)),
            None => {
                self.ensure_single_root()?;
                self.root = Some(element);
            }
        }
        Ok(())
    }

    fn push_node(&mut self, node: Node) {
        if let Some(parent) = self.open.last_mut() {
            parent.push_child(node);
        }
    }

    fn finish(self) -> Result<DocumentTree> {
        if let Some(unclosed) = self.open.last() {
            return Err(Error::Parse(format!(
                "unexpected end of document: <{}> is not closed",
                unclosed.name()
            )));
        }
        self.root
            .map(DocumentTree::new)
            .ok_or_else(|| Error::Parse("document has no root element".to_string()))
    }
}

/// Parse a markup document into a tree.
///
/// The prolog (declaration, doctype, leading comments) and anything after
/// the root element are validated but not kept. Inside the root every tag,
/// text run, comment and CDATA section keeps its exact source text.
pub fn parse_document(data: &[u8]) -> Result<DocumentTree> {
    let text = utf8(data, "document")?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::new();
    let mut consumed = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::Parse(format!("{} at byte {}", e, reader.error_position()))
        })?;
        let position = reader.buffer_position() as usize;
        let source = text
            .get(consumed..position)
            .ok_or_else(|| Error::Parse(format!("invalid token boundary at byte {position}")))?;
        consumed = position;

        match event {
            Event::Start(start) => builder.open_element(tag_from_start(&start, source, false)?)?,
            Event::Empty(start) => {
                let tag = tag_from_start(&start, source, true)?;
                builder.attach(Element::from_tag(tag))?;
            }
            Event::End(_) => builder.close_element(source)?,
            Event::Eof => break,
            Event::Text(_) => {
                if builder.in_root() {
                    builder.push_node(Node::Text(source.to_string()));
                } else if !source.trim().is_empty() {
                    return Err(Error::Parse(format!(
                        "text outside the root element at byte {}",
                        position - source.len()
                    )));
                }
            }
            Event::Comment(_) => builder.push_node(Node::Comment(source.to_string())),
            _ => builder.push_node(Node::Markup(source.to_string())),
        }
    }

    builder.finish()
}
