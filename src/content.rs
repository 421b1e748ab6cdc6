//! Rich documentation content.
//!
//! Descriptions, types and initializers arrive as mixed text/element trees.
//! They are converted once, at ingestion, into a closed set of node variants so
//! rendering is an exhaustive match instead of dispatch on tag names.

use crate::xml::{XmlElement, XmlNode};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Content(pub Vec<ContentNode>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamListKind {
    Param,
    TemplateParam,
    Exception,
    RetVal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub head: bool,
    pub body: Content,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterItem {
    pub name: Option<Content>,
    pub description: Option<Content>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarListEntry {
    pub terms: Vec<Content>,
    pub definitions: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Text(String),
    Para(Content),
    Ref {
        refid: Option<String>,
        text: String,
    },
    LineBreak,
    SimpleSect {
        kind: Option<String>,
        title: Option<String>,
        body: Content,
    },
    ProgramListing(Vec<Content>),
    ComputerOutput(Content),
    Highlight {
        class: String,
        body: Content,
    },
    Space,
    Bold(Content),
    Italic(Content),
    Table(Vec<Vec<TableCell>>),
    ParameterList {
        kind: ParamListKind,
        items: Vec<ParameterItem>,
    },
    VariableList(Vec<VarListEntry>),
    List {
        ordered: bool,
        items: Vec<Content>,
    },
    /// Any tag without a dedicated variant; rendered as its plain text.
    Unknown {
        tag: String,
        text: String,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content(vec![ContentNode::Text(text.into())])
    }

    pub fn nodes(&self) -> &[ContentNode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the content would render nothing visible.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|node| match node {
            ContentNode::Text(t) => t.trim().is_empty(),
            ContentNode::Para(body) => body.is_blank(),
            _ => false,
        })
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.0 {
            node.collect_text(&mut out);
        }
        out
    }

    /// Converts the children of `element` into content nodes.
    pub fn from_element(element: &XmlElement) -> Self {
        let nodes = element
            .children
            .iter()
            .map(|child| match child {
                XmlNode::Text(t) => ContentNode::Text(t.clone()),
                XmlNode::Element(e) => ContentNode::from_element(e),
            })
            .collect();
        Content(nodes)
    }

    /// Like `from_element`, but absent when the element carries nothing.
    pub fn from_optional(element: &XmlElement) -> Option<Self> {
        let content = Self::from_element(element);
        if content.is_blank() {
            None
        } else {
            Some(content)
        }
    }
}

impl ContentNode {
    fn collect_text(&self, out: &mut String) {
        match self {
            ContentNode::Text(t) => out.push_str(t),
            ContentNode::Ref { text, .. } => out.push_str(text),
            ContentNode::Unknown { text, .. } => out.push_str(text),
            ContentNode::Space => out.push(' '),
            ContentNode::LineBreak => out.push('\n'),
            ContentNode::Para(body)
            | ContentNode::ComputerOutput(body)
            | ContentNode::Bold(body)
            | ContentNode::Italic(body)
            | ContentNode::Highlight { body, .. }
            | ContentNode::SimpleSect { body, .. } => out.push_str(&body.plain_text()),
            ContentNode::ProgramListing(lines) => {
                let text: Vec<String> = lines.iter().map(Content::plain_text).collect();
                out.push_str(&text.join("\n"));
            }
            ContentNode::Table(rows) => {
                for row in rows {
                    for cell in row {
                        out.push_str(&cell.body.plain_text());
                    }
                }
            }
            ContentNode::ParameterList { items, .. } => {
                for item in items {
                    if let Some(name) = &item.name {
                        out.push_str(&name.plain_text());
                    }
                    if let Some(description) = &item.description {
                        out.push_str(&description.plain_text());
                    }
                }
            }
            ContentNode::VariableList(entries) => {
                for entry in entries {
                    for part in entry.terms.iter().chain(&entry.definitions) {
                        out.push_str(&part.plain_text());
                    }
                }
            }
            ContentNode::List { items, .. } => {
                for item in items {
                    out.push_str(&item.plain_text());
                }
            }
        }
    }

    pub fn from_element(e: &XmlElement) -> Self {
        match e.name.as_str() {
            "para" => ContentNode::Para(Content::from_element(e)),
            "ref" => ContentNode::Ref {
                refid: e.attr("refid").map(str::to_string),
                text: e.text(),
            },
            "linebreak" => ContentNode::LineBreak,
            "simplesect" => {
                let title = e.first("title").map(|t| t.text());
                // The title is a child element; keep it out of the body.
                let body = Content(
                    e.children
                        .iter()
                        .filter_map(|child| match child {
                            XmlNode::Text(t) => Some(ContentNode::Text(t.clone())),
                            XmlNode::Element(c) if c.name == "title" => None,
                            XmlNode::Element(c) => Some(ContentNode::from_element(c)),
                        })
                        .collect(),
                );
                ContentNode::SimpleSect {
                    kind: e.attr("kind").map(str::to_string),
                    title,
                    body,
                }
            }
            "programlisting" => ContentNode::ProgramListing(
                e.elements_named("codeline")
                    .map(Content::from_element)
                    .collect(),
            ),
            "computeroutput" => ContentNode::ComputerOutput(Content::from_element(e)),
            "highlight" => ContentNode::Highlight {
                class: e.attr("class").unwrap_or("normal").to_string(),
                body: Content::from_element(e),
            },
            "sp" => ContentNode::Space,
            "bold" => ContentNode::Bold(Content::from_element(e)),
            "emphasis" | "italic" => ContentNode::Italic(Content::from_element(e)),
            "table" => ContentNode::Table(
                e.elements_named("row")
                    .map(|row| {
                        row.elements_named("entry")
                            .map(|entry| TableCell {
                                head: entry.attr("thead") == Some("yes"),
                                body: Content::from_element(entry),
                            })
                            .collect()
                    })
                    .collect(),
            ),
            "parameterlist" => {
                let kind = match e.attr("kind") {
                    Some("exception") => ParamListKind::Exception,
                    Some("templateparam") => ParamListKind::TemplateParam,
                    Some("retval") => ParamListKind::RetVal,
                    _ => ParamListKind::Param,
                };
                let items = e
                    .elements_named("parameteritem")
                    .map(|item| ParameterItem {
                        name: item
                            .first("parameternamelist")
                            .and_then(|list| list.first("parametername"))
                            .map(Content::from_element),
                        description: item
                            .first("parameterdescription")
                            .map(Content::from_element),
                    })
                    .collect();
                ContentNode::ParameterList { kind, items }
            }
            "variablelist" => {
                let mut entries: Vec<VarListEntry> = Vec::new();
                for child in e.elements() {
                    match child.name.as_str() {
                        "varlistentry" => entries.push(VarListEntry {
                            terms: child
                                .elements_named("term")
                                .map(Content::from_element)
                                .collect(),
                            definitions: Vec::new(),
                        }),
                        "listitem" => {
                            if let Some(entry) = entries.last_mut() {
                                entry.definitions.push(Content::from_element(child));
                            }
                        }
                        _ => {}
                    }
                }
                ContentNode::VariableList(entries)
            }
            "itemizedlist" | "orderedlist" => ContentNode::List {
                ordered: e.name == "orderedlist",
                items: e
                    .elements_named("listitem")
                    .map(Content::from_element)
                    .collect(),
            },
            other => ContentNode::Unknown {
                tag: other.to_string(),
                text: e.text(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    fn content(xml: &str) -> Content {
        Content::from_element(&parse_document(xml).unwrap().unwrap())
    }

    #[test]
    fn test_refs_and_tails() {
        let c = content(r#"<type>const <ref refid="x">Foo</ref> &amp;</type>"#);
        assert_eq!(c.nodes().len(), 3);
        assert_eq!(
            c.nodes()[1],
            ContentNode::Ref {
                refid: Some("x".to_string()),
                text: "Foo".to_string()
            }
        );
        assert_eq!(c.plain_text(), "const Foo &");
    }

    #[test]
    fn test_simplesect_title_is_not_body() {
        let c = content(
            r#"<d><para><simplesect kind="par"><title>Note</title><para>Body</para></simplesect></para></d>"#,
        );
        let ContentNode::Para(para) = &c.nodes()[0] else {
            panic!("expected paragraph");
        };
        match &para.nodes()[0] {
            ContentNode::SimpleSect { kind, title, body } => {
                assert_eq!(kind.as_deref(), Some("par"));
                assert_eq!(title.as_deref(), Some("Note"));
                assert_eq!(body.plain_text(), "Body");
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_parameter_list_picks_first_name() {
        let c = content(
            r#"<d><parameterlist kind="param"><parameteritem><parameternamelist><parametername>baz</parametername><parametername>qux</parametername></parameternamelist><parameterdescription><para>Baz.</para></parameterdescription></parameteritem></parameterlist></d>"#,
        );
        match &c.nodes()[0] {
            ContentNode::ParameterList { kind, items } => {
                assert_eq!(*kind, ParamListKind::Param);
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].name.as_ref().unwrap().plain_text(), "baz");
                assert_eq!(items[0].description.as_ref().unwrap().plain_text(), "Baz.");
            }
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_keeps_text() {
        let c = content("<d><ulink url=\"http://x\">site</ulink></d>");
        assert_eq!(
            c.nodes()[0],
            ContentNode::Unknown {
                tag: "ulink".to_string(),
                text: "site".to_string()
            }
        );
    }

    #[test]
    fn test_blank_content_is_absent() {
        let e = parse_document("<briefdescription>\n  <para> </para>\n</briefdescription>")
            .unwrap()
            .unwrap();
        assert!(Content::from_optional(&e).is_none());
    }
}
