//! Content-to-display-tree renderer.
//!
//! Every render call appends to a destination element and returns the
//! length of the plain text it produced, which declaration layout uses to
//! decide where to break long signatures.

use crate::config::Locale;
use crate::content::{Content, ContentNode, ParamListKind};
use crate::entity::EntityStore;
use crate::html::Element;
use crate::naming::TemplateDepth;

/// Marker standing in for elided template arguments.
pub const ELLIPSIS: &str = " ... ";

/// Whether cross-references become links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    Linked,
    /// Overview listings render references as plain text.
    Plain,
}

/// Collapses template argument lists across several text segments.
///
/// Depth and the "skipped" flag carry over between calls so a type split
/// over text and references abbreviates as one string.
#[derive(Debug, Default)]
pub struct Abbreviator {
    depth: TemplateDepth,
    skipped: bool,
}

impl Abbreviator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abbreviates one segment. Text inside `<...>` is dropped; the ellipsis
    /// goes in front of the outermost `>` only when nested brackets were
    /// dropped as well.
    pub fn feed(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '<' => {
                    if self.depth.open() == 1 {
                        out.push(c);
                    } else {
                        self.skipped = true;
                    }
                }
                '>' if self.depth.depth() > 0 => {
                    self.depth.close();
                    if self.depth.depth() == 0 {
                        if self.skipped {
                            out.push_str(ELLIPSIS);
                        }
                        out.push(c);
                        self.skipped = false;
                    }
                }
                _ if self.depth.depth() > 0 => {}
                _ => out.push(c),
            }
        }
        out
    }
}

/// Abbreviates a single string.
pub fn abbreviate(text: &str) -> String {
    Abbreviator::new().feed(text)
}

pub struct ContentRenderer<'a> {
    store: &'a EntityStore,
    locale: &'a Locale,
}

impl<'a> ContentRenderer<'a> {
    pub fn new(store: &'a EntityStore, locale: &'a Locale) -> Self {
        Self { store, locale }
    }

    pub fn store(&self) -> &'a EntityStore {
        self.store
    }

    pub fn locale(&self) -> &'a Locale {
        self.locale
    }

    /// Target of a cross-reference, if the id is known and has a page.
    pub fn resolve_ref(&self, refid: Option<&str>) -> Option<&'a str> {
        let entity = self.store.get(refid?)?;
        if entity.url.is_empty() {
            None
        } else {
            Some(entity.url.as_str())
        }
    }

    pub fn render(&self, content: &Content, dest: &mut Element, links: LinkMode) -> usize {
        content
            .nodes()
            .iter()
            .map(|node| self.render_node(node, dest, links))
            .sum()
    }

    fn render_optional(&self, content: Option<&Content>, dest: &mut Element, links: LinkMode) -> usize {
        content.map_or(0, |c| self.render(c, dest, links))
    }

    fn heading(&self, dest: &mut Element, key: &str) -> usize {
        let label = self.locale.localize(key);
        let len = label.chars().count();
        dest.push(Element::new("h4").with_text(label));
        len
    }

    fn render_node(&self, node: &ContentNode, dest: &mut Element, links: LinkMode) -> usize {
        match node {
            ContentNode::Text(text) => {
                dest.push_text(text.as_str());
                text.chars().count()
            }
            ContentNode::Para(body) => {
                let p = dest.push_element(Element::new("p"));
                self.render(body, p, links)
            }
            ContentNode::Ref { refid, text } => {
                match (links, self.resolve_ref(refid.as_deref())) {
                    (LinkMode::Linked, Some(url)) => {
                        dest.push(Element::new("a").with_attr("href", url).with_text(text.as_str()));
                    }
                    _ => dest.push_text(text.as_str()),
                }
                text.chars().count()
            }
            ContentNode::LineBreak => {
                dest.push(Element::new("br"));
                0
            }
            ContentNode::SimpleSect { kind, title, body } => {
                let mut len = match (kind.as_deref(), title) {
                    (Some("return"), _) => self.heading(dest, "returns"),
                    (Some("see"), _) => self.heading(dest, "see"),
                    (_, Some(title)) => {
                        dest.push(Element::new("h4").with_text(title.as_str()));
                        title.chars().count()
                    }
                    _ => 0,
                };
                let div = dest.push_element(Element::new("div").with_class("par"));
                len += self.render(body, div, links);
                len
            }
            ContentNode::ProgramListing(lines) => {
                let code = dest.push_element(Element::new("div").with_class("listing"));
                let mut len = 0;
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        code.push(Element::new("br"));
                    }
                    len += self.render(line, code, links);
                }
                len
            }
            ContentNode::ComputerOutput(body) => {
                let span = dest.push_element(Element::new("span").with_class("tt"));
                self.render(body, span, links)
            }
            ContentNode::Highlight { class, body } => {
                let span = dest.push_element(Element::new("span").with_class(format!("hl-{}", class)));
                self.render(body, span, links)
            }
            ContentNode::Space => {
                dest.push_text("\u{a0}");
                1
            }
            ContentNode::Bold(body) => {
                let strong = dest.push_element(Element::new("strong"));
                self.render(body, strong, links)
            }
            ContentNode::Italic(body) => {
                let em = dest.push_element(Element::new("em"));
                self.render(body, em, links)
            }
            ContentNode::Table(rows) => {
                let table = dest.push_element(Element::new("table").with_class("paramlist"));
                let mut len = 0;
                for row in rows {
                    let tr = table.push_element(Element::new("tr"));
                    for (i, cell) in row.iter().enumerate() {
                        let tag = if cell.head { "th" } else { "td" };
                        let class = if i == 0 { "paramname" } else { "paramdescr" };
                        let td = tr.push_element(Element::new(tag).with_class(class));
                        len += self.render(&cell.body, td, links);
                    }
                }
                len
            }
            ContentNode::ParameterList { kind, items } => {
                let key = match kind {
                    ParamListKind::Exception => "exceptions",
                    ParamListKind::TemplateParam => "templateparams",
                    ParamListKind::Param | ParamListKind::RetVal => "parameters",
                };
                let mut len = self.heading(dest, key);
                let div = dest.push_element(Element::new("div").with_class("par"));
                let table = div.push_element(Element::new("table").with_class("paramlist"));
                for item in items {
                    let tr = table.push_element(Element::new("tr"));
                    let name = tr.push_element(Element::new("td").with_class("paramname"));
                    len += self.render_optional(item.name.as_ref(), name, links);
                    let descr = tr.push_element(Element::new("td").with_class("paramdescr"));
                    len += self.render_optional(item.description.as_ref(), descr, links);
                }
                len
            }
            ContentNode::VariableList(entries) => {
                let ul = dest.push_element(Element::new("ul").with_class("varlist"));
                let mut len = 0;
                for entry in entries {
                    let li = ul.push_element(Element::new("li"));
                    for term in &entry.terms {
                        let p = li.push_element(Element::new("p").with_class("head"));
                        len += self.render(term, p, links);
                    }
                    for definition in &entry.definitions {
                        let p = li.push_element(Element::new("p"));
                        len += self.render(definition, p, links);
                    }
                }
                len
            }
            ContentNode::List { ordered, items } => {
                let list = dest.push_element(Element::new(if *ordered { "ol" } else { "ul" }));
                let mut len = 0;
                for item in items {
                    let li = list.push_element(Element::new("li"));
                    len += self.render(item, li, links);
                }
                len
            }
            ContentNode::Unknown { text, .. } => {
                dest.push_text(text.as_str());
                text.chars().count()
            }
        }
    }

    /// Renders `content` with template argument lists collapsed. Only text
    /// and references survive; other structure is flattened to its text.
    pub fn render_abbreviated(&self, content: &Content, dest: &mut Element, links: LinkMode) -> usize {
        let mut abbreviator = Abbreviator::new();
        let mut len = 0;
        for node in content.nodes() {
            match node {
                ContentNode::Ref { refid, text } => {
                    let text = abbreviator.feed(text);
                    len += text.chars().count();
                    match (links, self.resolve_ref(refid.as_deref())) {
                        (LinkMode::Linked, Some(url)) if !text.is_empty() => {
                            dest.push(Element::new("a").with_attr("href", url).with_text(text));
                        }
                        _ => dest.push_text(text),
                    }
                }
                other => {
                    let text = abbreviator.feed(&Content(vec![other.clone()]).plain_text());
                    len += text.chars().count();
                    dest.push_text(text);
                }
            }
        }
        len
    }

    /// Renders a plain string, abbreviated or verbatim.
    pub fn render_str(&self, text: &str, dest: &mut Element, abbreviated: bool) -> usize {
        let text = if abbreviated {
            abbreviate(text)
        } else {
            text.to_string()
        };
        let len = text.chars().count();
        dest.push_text(text);
        len
    }
}
