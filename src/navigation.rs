//! Sidebar and breadcrumb structures.
//!
//! A page's sidebar is the one its parent built while listing its members,
//! so every page shows its siblings. Sidebars and breadcrumb trails are plain
//! owned values: a child receives a clone and can never disturb the branch
//! it was cloned from.

use std::collections::HashMap;

use crate::config::{title_case, Locale};
use crate::entity::{EntityKind, EntityStore, ROOT_ID};
use crate::html::Element;

/// Represents a navigation link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub title: String,
    pub link: String,
}

impl NavLink {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    pub fn to_element(&self) -> Element {
        Element::new("a")
            .with_attr("href", self.link.as_str())
            .with_text(self.title.as_str())
    }
}

/// A titled list of links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSection {
    pub title: String,
    pub links: Vec<NavLink>,
}

impl NavSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            links: Vec::new(),
        }
    }

    pub fn push(&mut self, link: NavLink) {
        self.links.push(link);
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    fn list_element(&self) -> Element {
        let mut ul = Element::new("ul");
        for link in &self.links {
            ul.push(Element::new("li").with_child(link.to_element()));
        }
        ul
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarHeading {
    /// Link back to the page that owns the listed members.
    Up(NavLink),
    Title(String),
}

/// Navigation column of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub heading: SidebarHeading,
    pub sections: Vec<NavSection>,
    /// Site-wide sections appended below the page's own.
    pub global: Vec<NavSection>,
}

impl Sidebar {
    pub fn new(heading: SidebarHeading, global: Vec<NavSection>) -> Self {
        Self {
            heading,
            sections: Vec::new(),
            global,
        }
    }

    pub fn to_element(&self) -> Element {
        let mut nav = Element::new("div").with_id("nav");
        nav.push(Element::new("div").with_id("nav-overlay"));

        let head = nav.push_element(Element::new("h2"));
        match &self.heading {
            SidebarHeading::Up(link) => head.push(link.to_element().with_class("nav-up")),
            SidebarHeading::Title(title) => head.push(
                Element::new("span")
                    .with_class("nav-up")
                    .with_text(title.as_str()),
            ),
        }

        for section in &self.sections {
            let div = nav.push_element(Element::new("div"));
            div.push(Element::new("h3").with_text(section.title.as_str()));
            div.push(section.list_element());
        }
        for section in &self.global {
            nav.push(Element::new("h3").with_text(section.title.as_str()));
            nav.push(section.list_element());
        }
        nav
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub link: NavLink,
    /// Text shown between this link and the next element of the caption.
    pub separator: Option<&'static str>,
}

/// Links to the pages enclosing the current one, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumbs {
    crumbs: Vec<Crumb>,
}

impl Breadcrumbs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    /// Sets the text following the innermost link.
    pub fn separate_last(&mut self, separator: &'static str) {
        if let Some(last) = self.crumbs.last_mut() {
            last.separator = Some(separator);
        }
    }

    pub fn push(&mut self, link: NavLink) {
        self.crumbs.push(Crumb {
            link,
            separator: None,
        });
    }

    /// Appends the trail to `dest`, followed by `current` as plain text.
    pub fn render_into(&self, dest: &mut Element, current: &str) {
        for crumb in &self.crumbs {
            dest.push(crumb.link.to_element());
            if let Some(separator) = crumb.separator {
                dest.push_text(separator);
            }
        }
        dest.push(Element::new("span").with_text(current));
    }
}

/// Site-wide sidebar sections: modules, special pages and header files
/// reachable from the root, each sorted by name.
pub fn global_sections(store: &EntityStore, locale: &Locale) -> Vec<NavSection> {
    let mut by_kind: HashMap<&EntityKind, Vec<_>> = HashMap::new();
    let root = store.get(ROOT_ID).map(|r| r.all_members.iter());
    for entity in root.into_iter().flatten().filter_map(|id| store.get(id)) {
        by_kind.entry(&entity.kind).or_default().push(entity);
    }

    let layout: [(&str, &[EntityKind]); 3] = [
        ("groups", &[EntityKind::Group]),
        ("pages", &[EntityKind::Page]),
        ("headers", &[EntityKind::Dir, EntityKind::File]),
    ];

    let mut sections = Vec::new();
    for (key, kinds) in layout {
        let mut section = NavSection::new(title_case(&locale.localize(key)));
        for kind in kinds {
            let Some(entities) = by_kind.get_mut(kind) else {
                continue;
            };
            entities.sort_by(|a, b| a.name.cmp(&b.name));
            for entity in entities.iter() {
                let title = entity.title.clone().unwrap_or_else(|| entity.name.clone());
                section.push(NavLink::new(title, entity.url.as_str()));
            }
        }
        if !section.is_empty() {
            sections.push(section);
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    #[test]
    fn test_breadcrumb_caption() {
        let mut trail = Breadcrumbs::new();
        trail.push(NavLink::new("demo", "namespace-demo-1111.html"));
        trail.push(NavLink::new("parent", "class-demo-parent-2222.html"));
        trail.separate_last("::");

        let mut caption = Element::new("span");
        trail.render_into(&mut caption, "foo");
        assert_eq!(caption.text(), "demoparent::foo");
        assert_eq!(caption.find_all(&|e| e.tag == "a").len(), 2);
    }

    #[test]
    fn test_cloned_sidebar_is_independent() {
        let mut parent = Sidebar::new(SidebarHeading::Title("Navigation".to_string()), Vec::new());
        let mut section = NavSection::new("Functions");
        section.push(NavLink::new("foo", "a.html"));
        parent.sections.push(section);

        let mut child = parent.clone();
        child.sections[0].push(NavLink::new("bar", "b.html"));
        assert_eq!(parent.sections[0].links.len(), 1);
        assert_eq!(child.sections[0].links.len(), 2);
    }

    #[test]
    fn test_sidebar_element() {
        let mut global = NavSection::new("Modules");
        global.push(NavLink::new("Core", "group-core-0000.html"));
        let sidebar = Sidebar::new(
            SidebarHeading::Up(NavLink::new("demo", "namespace-demo-1111.html")),
            vec![global],
        );
        assert_eq!(
            sidebar.to_element().to_html(),
            "<div id=\"nav\"><div id=\"nav-overlay\"></div>\
             <h2><a href=\"namespace-demo-1111.html\" class=\"nav-up\">demo</a></h2>\
             <h3>Modules</h3><ul><li><a href=\"group-core-0000.html\">Core</a></li></ul></div>"
        );
    }

    #[test]
    fn test_global_sections() {
        let mut store = EntityStore::new();
        for (id, kind, name, title) in [
            ("g2", EntityKind::Group, "zeta", Some("Zeta Module")),
            ("g1", EntityKind::Group, "alpha", None),
            ("f", EntityKind::File, "demo.h", None),
            ("d", EntityKind::Dir, "include/", None),
            ("ns", EntityKind::Namespace, "demo", None),
        ] {
            let mut e = Entity::new(id, kind).with_name(name);
            e.title = title.map(str::to_string);
            e.url = format!("{}.html", id);
            store.insert(e);
            store.get_mut(ROOT_ID).unwrap().all_members.insert(id.to_string());
        }

        let sections = global_sections(&store, &Locale::new());
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Modules");
        let titles: Vec<&str> = sections[0].links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, ["alpha", "Zeta Module"]);
        assert_eq!(sections[1].title, "Header Files");
        let headers: Vec<&str> = sections[1].links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(headers, ["include/", "demo.h"]);
    }
}
