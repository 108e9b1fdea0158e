//! Minimal owned XML tree over quick-xml events
//!
//! Only what the filler needs: elements keep their original start tag
//! (attributes and namespace prefixes untouched), text is held unescaped, and
//! everything else (declaration, comments, CDATA, processing instructions)
//! is carried through as-is.

use crate::error::TemplateError;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
    Other(Event<'static>),
}

impl Node {
    pub(crate) fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    fn is_element(&self, name: &str) -> bool {
        self.as_element().is_some_and(|element| element.is(name))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    start: BytesStart<'static>,
    pub(crate) children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub(crate) fn empty(name: &str) -> Self {
        Self {
            self_closing: true,
            ..Self::new(name)
        }
    }

    pub(crate) fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.start.push_attribute((key, value));
        self
    }

    pub(crate) fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Qualified-name match, prefix included (`w:p`)
    pub(crate) fn is(&self, name: &str) -> bool {
        self.start.name().as_ref() == name.as_bytes()
    }

    pub(crate) fn child_elements<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .filter(move |element| element.is(name))
    }

    pub(crate) fn child_elements_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> + 'a {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .filter(move |element| element.is(name))
    }

    pub(crate) fn first_child<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.child_elements(name).next()
    }

    pub(crate) fn first_child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|element| element.is(name))
    }

    /// Index of the first direct child element with this name
    pub(crate) fn position_of(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|node| node.is_element(name))
    }

    /// Drop every direct child element with this name
    pub(crate) fn remove_children(&mut self, name: &str) {
        self.children.retain(|node| !node.is_element(name));
    }

    /// Concatenated text of all direct text children
    pub(crate) fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Parse a document into its top-level nodes
pub(crate) fn parse(xml: &str) -> Result<Vec<Node>, TemplateError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            TemplateError::Xml(format!(
                "error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        let node = match event {
            Event::Start(start) => {
                stack.push(Element {
                    start: start.into_owned(),
                    children: Vec::new(),
                    self_closing: false,
                });
                continue;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| TemplateError::Xml("unbalanced end tag".to_string()))?;
                Node::Element(element)
            }
            Event::Empty(start) => Node::Element(Element {
                start: start.into_owned(),
                children: Vec::new(),
                self_closing: true,
            }),
            Event::Text(text) => {
                let unescaped = text
                    .unescape()
                    .map_err(|e| TemplateError::Xml(format!("invalid text content: {}", e)))?;
                Node::Text(unescaped.into_owned())
            }
            Event::Eof => break,
            other => Node::Other(other.into_owned()),
        };

        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    if let Some(open) = stack.last() {
        return Err(TemplateError::Xml(format!(
            "unclosed element <{}>",
            String::from_utf8_lossy(open.start.name().as_ref())
        )));
    }

    Ok(roots)
}

/// Serialize nodes back to XML text
pub(crate) fn write(nodes: &[Node]) -> Result<String, TemplateError> {
    let mut writer = Writer::new(Vec::new());
    for node in nodes {
        write_node(&mut writer, node)?;
    }
    String::from_utf8(writer.into_inner())
        .map_err(|e| TemplateError::Xml(format!("serialized XML is not UTF-8: {}", e)))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), TemplateError> {
    match node {
        Node::Element(element) if element.self_closing && element.children.is_empty() => {
            emit(writer, Event::Empty(element.start.borrow()))
        }
        Node::Element(element) => {
            emit(writer, Event::Start(element.start.borrow()))?;
            for child in &element.children {
                write_node(writer, child)?;
            }
            emit(writer, Event::End(element.start.to_end()))
        }
        Node::Text(text) => emit(
            writer,
            Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))),
        ),
        Node::Other(event) => emit(writer, event.borrow()),
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), TemplateError> {
    writer
        .write_event(event)
        .map_err(|e| TemplateError::Xml(format!("write failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_markup() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="urn:w"><w:body><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t xml:space="preserve">A &amp; B </w:t></w:r></w:p></w:body></w:document>"#;

        let nodes = parse(xml).unwrap();
        assert_eq!(write(&nodes).unwrap(), xml);
    }

    #[test]
    fn test_text_is_unescaped() {
        let nodes = parse("<a>1 &lt; 2</a>").unwrap();
        let a = nodes[0].as_element().unwrap();
        assert_eq!(a.text(), "1 < 2");
    }

    #[test]
    fn test_child_lookup() {
        let nodes = parse("<r><x/><y>1</y><x>2</x></r>").unwrap();
        let root = nodes[0].as_element().unwrap();

        assert_eq!(root.child_elements("x").count(), 2);
        assert_eq!(root.position_of("y"), Some(1));
        assert_eq!(root.first_child("y").unwrap().text(), "1");
        assert!(root.first_child("z").is_none());
    }

    #[test]
    fn test_unclosed_element_rejected() {
        let err = parse("<a><b></b>").unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_mismatched_end_rejected() {
        assert!(parse("<a></b>").is_err());
    }

    #[test]
    fn test_built_elements_serialize() {
        let run = Element::new("w:r").with_child(Node::Element(
            Element::new("w:t")
                .with_attribute("xml:space", "preserve")
                .with_child(Node::Text("x < y".to_string())),
        ));
        let xml = write(&[Node::Element(run), Node::Element(Element::empty("w:br"))]).unwrap();
        assert_eq!(
            xml,
            r#"<w:r><w:t xml:space="preserve">x &lt; y</w:t></w:r><w:br/>"#
        );
    }
}
