//! Minimal owned element tree for extractor records.
//!
//! Records are small enough to be held in memory whole, and the content
//! conversion needs mixed text/element children in document order, so the
//! event stream from `quick-xml` is folded into a tree up front.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn first(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }
}

fn start_element(start: &BytesStart<'_>) -> Result<XmlElement, quick_xml::Error> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append(stack: &mut [XmlElement], root: &mut Option<XmlElement>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            // Only the first top-level element is kept; stray top-level text
            // (whitespace between prolog and root) is dropped.
            if let XmlNode::Element(e) = node {
                if root.is_none() {
                    *root = Some(e);
                }
            }
        }
    }
}

/// Parses a whole document and returns its root element, if any.
pub fn parse_document(source: &str) -> Result<Option<XmlElement>, quick_xml::Error> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(start_element(&start)?),
            Event::Empty(start) => {
                let element = start_element(&start)?;
                append(&mut stack, &mut root, XmlNode::Element(element));
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    append(&mut stack, &mut root, XmlNode::Element(element));
                }
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                if !text.is_empty() {
                    append(&mut stack, &mut root, XmlNode::Text(text));
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append(&mut stack, &mut root, XmlNode::Text(text));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_content() {
        let root = parse_document(
            r#"<?xml version="1.0"?><para>see <ref refid="a1">Foo</ref> &amp; more<linebreak/></para>"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(root.name, "para");
        assert_eq!(root.children.len(), 4);
        assert_eq!(root.children[0], XmlNode::Text("see ".to_string()));
        let reference = root.first("ref").unwrap();
        assert_eq!(reference.attr("refid"), Some("a1"));
        assert_eq!(reference.text(), "Foo");
        assert_eq!(root.text(), "see Foo & more");
        assert!(root.first("linebreak").is_some());
    }

    #[test]
    fn test_parse_malformed_document() {
        assert!(parse_document("<a><b></a>").is_err());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse_document("").unwrap(), None);
    }
}
