//! Page partitioning and tree emission.
//!
//! Starting at the root, each call builds one page for a group of entities
//! sharing it (an overload set, or a template with its specializations) and
//! then recurses into the child groups it listed. Entities of inline-doc
//! kinds are rendered into their owner's page instead.

use indexmap::{IndexMap, IndexSet};
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::{title_case, GeneratorConfig};
use crate::entity::{Entity, EntityId, EntityKind, EntityStore, IncludeRef, Visibility, ROOT_ID};
use crate::html::Element;
use crate::navigation::{global_sections, Breadcrumbs, NavLink, NavSection, Sidebar, SidebarHeading};
use crate::renderer::{ContentRenderer, LinkMode};
use crate::signature::{base_names, define_decl, func_var_decl, struct_decl, typedef_decl};

/// One output document, ready to be laid out and written.
#[derive(Debug, Clone)]
pub struct Page {
    /// File name relative to the output directory.
    pub url: String,
    pub title: String,
    pub sidebar: Sidebar,
    pub content: Element,
}

/// What a member is listed as on its owner's page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberCategory {
    Namespaces,
    Types,
    Functions,
    Variables,
    Defines,
    Dirs,
    Files,
    Groups,
    Pages,
    Other,
}

impl MemberCategory {
    pub fn of(kind: &EntityKind) -> Self {
        match kind {
            EntityKind::Namespace => MemberCategory::Namespaces,
            k if k.is_type() => MemberCategory::Types,
            EntityKind::Function => MemberCategory::Functions,
            EntityKind::Variable => MemberCategory::Variables,
            EntityKind::Define => MemberCategory::Defines,
            EntityKind::Dir => MemberCategory::Dirs,
            EntityKind::File => MemberCategory::Files,
            EntityKind::Group => MemberCategory::Groups,
            EntityKind::Page => MemberCategory::Pages,
            _ => MemberCategory::Other,
        }
    }

    /// Locale key of the section heading.
    pub fn locale_key(&self) -> &'static str {
        match self {
            MemberCategory::Namespaces => "namespaces",
            MemberCategory::Types => "types",
            MemberCategory::Functions => "functions",
            MemberCategory::Variables => "variables",
            MemberCategory::Defines => "defines",
            MemberCategory::Dirs => "dirs",
            MemberCategory::Files => "files",
            MemberCategory::Groups => "groups",
            MemberCategory::Pages => "pages",
            MemberCategory::Other => "other",
        }
    }

    fn is_collection(&self) -> bool {
        matches!(
            self,
            MemberCategory::Dirs | MemberCategory::Files | MemberCategory::Groups | MemberCategory::Pages
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub visibility: Visibility,
    pub is_static: bool,
    pub category: MemberCategory,
}

impl SectionKey {
    pub fn of(entity: &Entity) -> Self {
        let is_static = entity.modifiers.is_static
            && matches!(entity.kind, EntityKind::Function | EntityKind::Variable);
        Self {
            visibility: entity.visibility,
            is_static,
            category: MemberCategory::of(&entity.kind),
        }
    }
}

/// Members listed together in one table row. Constructors and destructors
/// sort ahead of named groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupName {
    Constructor,
    Destructor,
    Named(String),
}

impl GroupName {
    pub fn of(name: &str, constructor_names: &HashSet<String>) -> Self {
        if constructor_names.contains(name) {
            GroupName::Constructor
        } else if name.starts_with('~') {
            GroupName::Destructor
        } else if let Some(pos) = name.find('<') {
            GroupName::Named(name[..pos].trim().to_string())
        } else {
            GroupName::Named(name.to_string())
        }
    }
}

type Sections<'a> = HashMap<SectionKey, BTreeMap<GroupName, Vec<&'a Entity>>>;

/// A group queued for its own page while its parent is being built.
#[derive(Debug, Clone)]
struct PendingGroup {
    ids: Vec<EntityId>,
    trail: Breadcrumbs,
    specialization: bool,
}

pub struct PagePartitioner<'a> {
    store: &'a EntityStore,
    config: &'a GeneratorConfig,
    renderer: ContentRenderer<'a>,
    global: Vec<NavSection>,
    emitted: HashSet<String>,
    pages: Vec<Page>,
    inline_blocks: usize,
}

impl<'a> PagePartitioner<'a> {
    pub fn new(store: &'a EntityStore, config: &'a GeneratorConfig) -> Self {
        Self {
            store,
            config,
            renderer: ContentRenderer::new(store, &config.locale),
            global: global_sections(store, &config.locale),
            emitted: HashSet::new(),
            pages: Vec::new(),
            inline_blocks: 0,
        }
    }

    /// Number of inline member blocks rendered so far.
    pub fn inline_blocks(&self) -> usize {
        self.inline_blocks
    }

    /// Builds every page reachable from the root, depth-first.
    pub fn partition(&mut self) -> Vec<Page> {
        let root = self.store.root();
        self.emit(vec![root], None, Breadcrumbs::new());
        debug!(
            "Partitioned {} pages with {} inline blocks",
            self.pages.len(),
            self.inline_blocks
        );
        std::mem::take(&mut self.pages)
    }

    fn localize(&self, key: &str) -> String {
        self.config.locale.localize(key)
    }

    fn emit(&mut self, mut group: Vec<&'a Entity>, sidebar: Option<Sidebar>, trail: Breadcrumbs) {
        group.sort_by(|a, b| {
            (&a.name, &a.definition, &a.id).cmp(&(&b.name, &b.definition, &b.id))
        });

        let mut specializations: Vec<&'a Entity> = Vec::new();
        if group.len() > 1 && group[0].kind.is_record() {
            let primary = group
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.name.chars().count())
                .map_or(0, |(i, _)| i);
            let primary = group.remove(primary);
            specializations = std::mem::replace(&mut group, vec![primary]);
        }
        let decls = group;
        let first = decls[0];

        if !self.emitted.insert(first.url.clone()) {
            debug!("Page {} already emitted, skipping", first.url);
            return;
        }

        let page_title = match (&first.kind, &first.title) {
            (EntityKind::Root, _) => title_case(&self.localize("index")),
            (_, Some(title)) => title_case(title),
            (_, None) => first.name.clone(),
        };

        let mut trail = trail;
        let incoming_trail = trail.clone();
        if !trail.is_empty() && !matches!(first.kind, EntityKind::File | EntityKind::Dir) {
            trail.separate_last("::");
        }
        let mut child_trail = trail.clone();
        if !first.full_name.is_empty() {
            child_trail.push(NavLink::new(first.name.as_str(), first.url.as_str()));
        }

        let mut content = Element::new("div").with_id("content");
        content.push(self.caption(first, &trail, &page_title));

        let sidebar = match (first.kind == EntityKind::Root, sidebar) {
            (false, Some(sidebar)) => sidebar,
            _ => Sidebar::new(
                SidebarHeading::Title(self.localize("navigation")),
                self.global.clone(),
            ),
        };
        let mut child_sidebar = Sidebar::new(
            SidebarHeading::Up(NavLink::new(page_title.as_str(), first.url.as_str())),
            self.global.clone(),
        );

        let mut overview = Element::new("div").with_id("overview");
        if let Some(includes) = self.include_block(&decls) {
            overview.push(includes);
        }

        let mut inline = Element::new("div").with_id("inline");
        let mut inline_list = Element::new("ul").with_class("inline-list");
        let overloaded = decls.len() > 1;
        let mut overview_list = Element::new("ol").with_class("overview-list");
        let mut details_list = Element::new("ol").with_class("details-list");

        for (n, decl) in decls.iter().enumerate() {
            let anchor = format!("details{}", n + 1);
            if overloaded && matches!(decl.kind, EntityKind::Function | EntityKind::Variable) {
                let li = overview_list.push_element(Element::new("li").with_class("def"));
                let a = li.push_element(Element::new("a").with_attr("href", format!("#{}", anchor)));
                func_var_decl(&self.renderer, decl, a, LinkMode::Plain, true);
            }
            let def = self.definition(decl, &anchor, if overloaded { "li" } else { "div" });
            if overloaded {
                details_list.push(def);
            } else {
                overview.push(def);
            }
        }
        if overloaded {
            overview.push(overview_list);
            inline.push(details_list);
        }

        let mut children: Vec<PendingGroup> = Vec::new();
        let sections = self.categorize(&decls);
        self.emit_sections(
            &decls,
            &sections,
            &mut overview,
            &mut inline_list,
            &mut child_sidebar,
            &mut children,
            &child_trail,
        );

        for category in [
            MemberCategory::Groups,
            MemberCategory::Pages,
            MemberCategory::Files,
            MemberCategory::Dirs,
        ] {
            let key = SectionKey {
                visibility: Visibility::Public,
                is_static: false,
                category,
            };
            for entity in sections.get(&key).into_iter().flat_map(|g| g.values().flatten()) {
                children.push(PendingGroup {
                    ids: vec![entity.id.clone()],
                    trail: child_trail.clone(),
                    specialization: false,
                });
            }
        }

        if !inline_list.is_empty() {
            inline.push(inline_list);
        }
        let has_details = overloaded || !inline.is_empty();

        if !specializations.is_empty() {
            let title = self.localize("specializations");
            let mut div = Element::new("div");
            div.push(Element::new("h3").with_text(title.as_str()));
            let mut nav = NavSection::new(title);
            let table = div.push_element(Element::new("table").with_class("decllist"));
            for s in &specializations {
                children.push(PendingGroup {
                    ids: vec![s.id.clone()],
                    trail: incoming_trail.clone(),
                    specialization: true,
                });
                let tr = table.push_element(Element::new("tr"));
                tr.push(Element::new("td").with_class("decltype").with_text(s.kind.as_str()));
                let td = tr.push_element(Element::new("td").with_class("declname"));
                td.push(
                    Element::new("a")
                        .with_attr("href", s.url.as_str())
                        .with_class("name")
                        .with_text(s.name.as_str()),
                );
                nav.push(NavLink::new(s.name.as_str(), s.url.as_str()));
            }
            inline.push(div);
            child_sidebar.sections.push(nav);
        }

        content.push(overview);
        if has_details {
            content.push(Element::new("h3").with_text(self.localize("details")));
        }
        if has_details || !inline.is_empty() {
            content.push(inline);
        }

        self.pages.push(Page {
            url: first.url.clone(),
            title: page_title,
            sidebar,
            content,
        });

        let owners: HashSet<&str> = decls.iter().map(|d| d.id.as_str()).collect();
        for pending in children {
            let child_group: Vec<&'a Entity> = pending
                .ids
                .iter()
                .filter_map(|id| self.store.get(id))
                .filter(|d| pending.specialization || d.parent().map_or(false, |p| owners.contains(p)))
                .collect();
            if !child_group.is_empty() {
                self.emit(child_group, Some(child_sidebar.clone()), pending.trail);
            }
        }
    }

    fn caption(&self, first: &Entity, trail: &Breadcrumbs, page_title: &str) -> Element {
        let mut caption = Element::new("h2");
        let links = caption.push_element(Element::new("span").with_class("page-caption"));
        trail.render_into(links, page_title);
        caption.push_text(" ");
        if !matches!(first.kind, EntityKind::Root | EntityKind::Page) {
            caption.push(
                Element::new("span")
                    .with_class("page-type")
                    .with_text(format!("({})", self.localize(first.kind.as_str()))),
            );
        }
        caption
    }

    /// `#include <...>` lines for the page's entities, deduplicated and sorted.
    fn include_block(&self, decls: &[&Entity]) -> Option<Element> {
        let mut includes: IndexMap<&str, &IncludeRef> = IndexMap::new();
        for decl in decls.iter().filter(|d| d.kind != EntityKind::File) {
            for include in &decl.includes {
                let key = include.refid.as_deref().unwrap_or(include.text.as_str());
                includes.insert(key, include);
            }
        }
        if includes.is_empty() {
            return None;
        }
        let mut sorted: Vec<&IncludeRef> = includes.into_values().collect();
        sorted.sort_by(|a, b| a.text.cmp(&b.text));

        let mut p = Element::new("p").with_class("include");
        for (i, include) in sorted.into_iter().enumerate() {
            if i > 0 {
                p.push(Element::new("br"));
            }
            let span = p.push_element(Element::new("span").with_text("#include <"));
            match include.refid.as_deref().and_then(|id| self.store.get(id)) {
                Some(file) => span.push(
                    Element::new("a")
                        .with_attr("href", file.url.as_str())
                        .with_text(file.full_name.as_str()),
                ),
                None => span.push(Element::new("a").with_text(include.text.as_str())),
            }
            span.push_text(">");
        }
        Some(p)
    }

    /// Declaration, brief, enumeration values and details of one entity.
    fn definition(&self, decl: &Entity, anchor: &str, tag: &str) -> Element {
        let mut def = Element::new(tag).with_class("def");
        match decl.kind {
            EntityKind::Function | EntityKind::Variable => {
                let p = def.push_element(Element::new("p"));
                p.push(Element::new("a").with_attr("name", anchor));
                func_var_decl(&self.renderer, decl, p, LinkMode::Linked, false);
            }
            ref kind if kind.is_record() => {
                struct_decl(&self.renderer, decl, def.push_element(Element::new("p")));
            }
            _ => {}
        }
        if let Some(brief) = &decl.brief {
            let div = def.push_element(Element::new("div").with_class("brief"));
            self.renderer.render(brief, div, LinkMode::Linked);
        }
        if decl.kind == EntityKind::Enum {
            def.push(self.enum_values(decl));
        }
        if let Some(details) = &decl.detailed {
            let div = def.push_element(Element::new("div").with_class("details"));
            self.renderer.render(details, div, LinkMode::Linked);
        }
        def
    }

    fn enum_values(&self, decl: &Entity) -> Element {
        let mut div = Element::new("div");
        div.push(Element::new("h4").with_text(self.localize("enumvalues")));
        let par = div.push_element(Element::new("div").with_class("par"));
        let table = par.push_element(Element::new("table").with_class("paramlist"));
        for value in &decl.enum_values {
            let tr = table.push_element(Element::new("tr"));
            tr.push(Element::new("td").with_class("paramname").with_text(value.name.as_str()));
            let td = tr.push_element(Element::new("td"));
            if let Some(brief) = &value.brief {
                self.renderer.render(brief, td, LinkMode::Linked);
            }
        }
        div
    }

    /// Buckets every listed member of the page's entities by section and
    /// group name.
    fn categorize(&self, decls: &[&'a Entity]) -> Sections<'a> {
        let mut constructor_names = HashSet::new();
        let mut members: IndexSet<&str> = IndexSet::new();
        for decl in decls {
            constructor_names.extend(base_names(self.store, decl));
            members.extend(decl.all_members.iter().map(String::as_str));
        }

        let mut sections: Sections<'a> = HashMap::new();
        for entity in members.into_iter().filter_map(|id| self.store.get(id)) {
            if entity.id == ROOT_ID {
                continue;
            }
            sections
                .entry(SectionKey::of(entity))
                .or_default()
                .entry(GroupName::of(&entity.name, &constructor_names))
                .or_default()
                .push(entity);
        }
        sections
    }

    fn section_title(&self, owner: &Entity, key: &SectionKey) -> String {
        let mut title = String::new();
        if owner.kind.is_record()
            && matches!(
                key.category,
                MemberCategory::Types | MemberCategory::Functions | MemberCategory::Variables
            )
        {
            title.push_str(&self.localize(key.visibility.as_str()));
            title.push(' ');
            if key.is_static {
                title.push_str(&self.localize("static"));
                title.push(' ');
            }
        }
        title.push_str(&self.localize(key.category.locale_key()));
        title_case(&title)
    }

    fn enabled_visibilities(&self) -> Vec<Visibility> {
        let mut enabled = vec![Visibility::Public];
        if self.config.show_protected {
            enabled.push(Visibility::Protected);
        }
        if self.config.show_private {
            enabled.push(Visibility::Private);
        }
        enabled
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_sections(
        &mut self,
        decls: &[&'a Entity],
        sections: &Sections<'a>,
        overview: &mut Element,
        inline_list: &mut Element,
        child_sidebar: &mut Sidebar,
        children: &mut Vec<PendingGroup>,
        child_trail: &Breadcrumbs,
    ) {
        let owner = decls[0];
        let destructor_names: HashSet<String> =
            decls.iter().map(|d| format!("~{}", d.name)).collect();

        let mut categories = vec![
            MemberCategory::Namespaces,
            MemberCategory::Types,
            MemberCategory::Functions,
            MemberCategory::Variables,
            MemberCategory::Defines,
        ];
        if owner.kind == EntityKind::Dir {
            categories.extend([MemberCategory::Dirs, MemberCategory::Files]);
        }

        for visibility in self.enabled_visibilities() {
            for is_static in [false, true] {
                for &category in &categories {
                    let key = SectionKey {
                        visibility,
                        is_static,
                        category,
                    };
                    let Some(groups) = sections.get(&key) else {
                        continue;
                    };
                    let title = self.section_title(owner, &key);
                    let mut nav = NavSection::new(title.as_str());
                    let mut table = Element::new("table").with_class("decllist");

                    for (group_name, members) in groups {
                        let members: Vec<&'a Entity> = match group_name {
                            GroupName::Destructor => members
                                .iter()
                                .copied()
                                .filter(|m| destructor_names.contains(&m.name))
                                .collect(),
                            _ => members.clone(),
                        };
                        let Some(representative) = members.first().copied() else {
                            continue;
                        };

                        let href = if representative.is_inline_doc() && *group_name != GroupName::Destructor {
                            let mut sorted = members.clone();
                            sorted.sort_by(|a, b| a.name.cmp(&b.name));
                            for member in &sorted {
                                inline_list.push(self.inline_member(member));
                            }
                            sorted.last().map(|m| m.url.clone()).unwrap_or_default()
                        } else {
                            let href = match group_name {
                                GroupName::Destructor => representative.url.clone(),
                                _ => members
                                    .iter()
                                    .min_by(|a, b| a.name.cmp(&b.name))
                                    .map(|m| m.url.clone())
                                    .unwrap_or_default(),
                            };
                            children.push(PendingGroup {
                                ids: members.iter().map(|m| m.id.clone()).collect(),
                                trail: child_trail.clone(),
                                specialization: false,
                            });
                            href
                        };

                        let label = match (&representative.title, group_name) {
                            (Some(title), _) => title.clone(),
                            (None, GroupName::Constructor) => owner.name.clone(),
                            (None, GroupName::Destructor) => format!("~{}", owner.name),
                            (None, GroupName::Named(name)) => name.clone(),
                        };
                        table.push(self.member_row(representative, group_name, &label, &href, category));
                        nav.push(NavLink::new(label, href));
                    }

                    if table.is_empty() {
                        continue;
                    }
                    let mut div = Element::new("div");
                    div.push(Element::new("h3").with_text(title));
                    div.push(table);
                    overview.push(div);
                    child_sidebar.sections.push(nav);
                }
            }
        }
    }

    fn member_row(
        &self,
        representative: &Entity,
        group_name: &GroupName,
        label: &str,
        href: &str,
        category: MemberCategory,
    ) -> Element {
        let mut tr = Element::new("tr");
        if !category.is_collection() {
            let td = tr.push_element(Element::new("td").with_class("decltype"));
            match representative.kind {
                EntityKind::Variable => {
                    if let Some(ty) = &representative.type_node {
                        self.renderer.render_abbreviated(ty, td, LinkMode::Linked);
                    }
                }
                EntityKind::Function => td.push_text(match group_name {
                    GroupName::Constructor => "constructor",
                    GroupName::Destructor => "destructor",
                    GroupName::Named(_) => "function",
                }),
                EntityKind::Define => td.push_text("#define"),
                ref kind => td.push_text(kind.as_str()),
            }
        }
        let td = tr.push_element(Element::new("td").with_class("declname"));
        td.push(
            Element::new("a")
                .with_attr("href", href)
                .with_class("name")
                .with_text(label),
        );
        let init = td.push_element(Element::new("span").with_class("init"));
        if representative.kind == EntityKind::Typedef {
            init.push_text(" = ");
            if let Some(ty) = &representative.type_node {
                self.renderer.render_abbreviated(ty, init, LinkMode::Linked);
            }
        }
        tr
    }

    /// Full documentation of an inline-doc member, placed under its anchor.
    fn inline_member(&mut self, member: &Entity) -> Element {
        self.inline_blocks += 1;
        let mut li = Element::new("li").with_class("details def");
        let decl = li.push_element(Element::new("div"));
        decl.push(Element::new("a").with_attr("name", member.anchor.as_str()));
        let p = decl.push_element(Element::new("p"));
        match member.kind {
            EntityKind::Typedef => typedef_decl(&self.renderer, member, p),
            EntityKind::Define => define_decl(&self.renderer, member, p),
            _ => func_var_decl(&self.renderer, member, p, LinkMode::Linked, false),
        }
        if let Some(brief) = &member.brief {
            let div = li.push_element(Element::new("div").with_class("brief"));
            self.renderer.render(brief, div, LinkMode::Linked);
        }
        if let Some(details) = &member.detailed {
            let div = li.push_element(Element::new("div").with_class("details"));
            self.renderer.render(details, div, LinkMode::Linked);
        }
        li
    }
}

/// Partitions a fully resolved store into pages.
pub fn partition(store: &EntityStore, config: &GeneratorConfig) -> Vec<Page> {
    PagePartitioner::new(store, config).partition()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;
    use crate::hierarchy::resolve_hierarchy;
    use crate::naming::resolve_names;

    fn entity(id: &str, kind: EntityKind, name: &str, members: &[&str]) -> Entity {
        let mut e = Entity::new(id, kind).with_name(name);
        for m in members {
            e.add_direct_member(*m);
        }
        e
    }

    fn resolved(entities: Vec<Entity>) -> EntityStore {
        let mut store = EntityStore::new();
        for e in entities {
            store.insert(e);
        }
        resolve_hierarchy(&mut store);
        resolve_names(&mut store);
        store
    }

    fn page<'p>(pages: &'p [Page], url: &str) -> &'p Page {
        pages
            .iter()
            .find(|p| p.url == url)
            .unwrap_or_else(|| panic!("no page {}", url))
    }

    fn link_texts(element: &Element) -> Vec<String> {
        element
            .find_all(&|e| e.tag == "a" && e.attr("class") == Some("name"))
            .iter()
            .map(|a| a.text())
            .collect()
    }

    #[test]
    fn test_group_names() {
        let ctors: HashSet<String> = ["Derived".to_string(), "Base".to_string()].into();
        assert_eq!(GroupName::of("Base", &ctors), GroupName::Constructor);
        assert_eq!(GroupName::of("~Derived", &ctors), GroupName::Destructor);
        assert_eq!(
            GroupName::of("factorial< 0 >", &ctors),
            GroupName::Named("factorial".to_string())
        );
        assert_eq!(GroupName::of("foo", &ctors), GroupName::Named("foo".to_string()));
        assert!(GroupName::Constructor < GroupName::Destructor);
        assert!(GroupName::Destructor < GroupName::Named("a".to_string()));
    }

    #[test]
    fn test_section_key() {
        let mut f = Entity::new("f", EntityKind::Function);
        f.modifiers.is_static = true;
        f.visibility = Visibility::Protected;
        let key = SectionKey::of(&f);
        assert!(key.is_static);
        assert_eq!(key.category, MemberCategory::Functions);

        let mut c = Entity::new("c", EntityKind::Class);
        c.modifiers.is_static = true;
        assert!(!SectionKey::of(&c).is_static);
        assert_eq!(MemberCategory::of(&EntityKind::Typedef), MemberCategory::Types);
    }

    #[test]
    fn test_overloads_share_one_page() {
        let mut f1 = entity("f1", EntityKind::Function, "foo", &[]);
        f1.definition = Some("int foo".to_string());
        f1.args = Some("(int)".to_string());
        let mut f2 = entity("f2", EntityKind::Function, "foo", &[]);
        f2.definition = Some("int foo".to_string());
        f2.args = Some("(double)".to_string());
        let store = resolved(vec![entity("cls", EntityKind::Class, "C", &["f1", "f2"]), f1, f2]);
        let pages = partition(&store, &GeneratorConfig::default());

        let class_page = page(&pages, &store.get("cls").unwrap().url);
        assert_eq!(link_texts(&class_page.content), ["foo"]);

        let f1_url = store.get("f1").unwrap().url.clone();
        let overloads = page(&pages, &f1_url);
        assert_eq!(overloads.content.find_all(&|e| e.attr("class") == Some("overview-list")).len(), 1);
        assert_eq!(overloads.content.find_all(&|e| e.attr("name") == Some("details2")).len(), 1);
        assert_eq!(store.get("f2").unwrap().url, f1_url);
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_inline_members_render_on_owner_page() {
        let mut var = entity("var", EntityKind::Variable, "count", &[]);
        var.type_node = Some(Content::text("int"));
        let store = resolved(vec![entity("cls", EntityKind::Class, "C", &["var"]), var]);
        let pages = partition(&store, &GeneratorConfig::default());

        assert_eq!(pages.len(), 2);
        let class_page = page(&pages, &store.get("cls").unwrap().url);
        let anchor = &store.get("var").unwrap().anchor;
        assert_eq!(
            class_page
                .content
                .find_all(&|e| e.attr("name") == Some(anchor.as_str()))
                .len(),
            1
        );
        assert_eq!(class_page.sidebar.sections.len(), 1);
        assert_eq!(class_page.sidebar.sections[0].title, "Types");
    }

    #[test]
    fn test_destructor_group_keeps_own_destructor() {
        let base = entity("base", EntityKind::Class, "Base", &["base_dtor"]);
        let mut derived = entity("derived", EntityKind::Class, "Derived", &["derived_dtor"]);
        derived.all_members.insert("base_dtor".to_string());
        let store = resolved(vec![
            base,
            derived,
            entity("base_dtor", EntityKind::Function, "~Base", &[]),
            entity("derived_dtor", EntityKind::Function, "~Derived", &[]),
        ]);
        let pages = partition(&store, &GeneratorConfig::default());

        let derived_page = page(&pages, &store.get("derived").unwrap().url);
        let rows = derived_page.content.find_all(&|e| e.tag == "tr");
        assert_eq!(rows.len(), 1);
        assert_eq!(link_texts(&derived_page.content), ["~Derived"]);
        let links = derived_page
            .content
            .find_all(&|e| e.tag == "a" && e.attr("class") == Some("name"));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attr("href"), Some(store.get("derived_dtor").unwrap().url.as_str()));
    }

    #[test]
    fn test_constructor_group() {
        let mut derived = entity("derived", EntityKind::Class, "Derived", &["ctor", "bctor"]);
        derived.bases.push(crate::entity::BaseRef {
            refid: Some("base".to_string()),
            text: "Base".to_string(),
            visibility: Visibility::Public,
            is_virtual: false,
        });
        let store = resolved(vec![
            entity("base", EntityKind::Class, "Base", &[]),
            derived,
            entity("ctor", EntityKind::Function, "Derived", &[]),
            entity("bctor", EntityKind::Function, "Base", &[]),
        ]);
        let pages = partition(&store, &GeneratorConfig::default());
        let derived_page = page(&pages, &store.get("derived").unwrap().url);
        assert_eq!(link_texts(&derived_page.content), ["Derived"]);
        let decltypes: Vec<String> = derived_page
            .content
            .find_all(&|e| e.attr("class") == Some("decltype"))
            .iter()
            .map(|e| e.text())
            .collect();
        assert_eq!(decltypes, ["constructor"]);
    }

    #[test]
    fn test_specializations_get_own_pages() {
        let store = resolved(vec![
            entity("ns", EntityKind::Namespace, "demo", &["fact", "fact0"]),
            entity("fact", EntityKind::Struct, "demo::factorial", &[]),
            entity("fact0", EntityKind::Struct, "demo::factorial< 0 >", &[]),
        ]);
        let pages = partition(&store, &GeneratorConfig::default());

        let ns_page = page(&pages, &store.get("ns").unwrap().url);
        assert_eq!(link_texts(&ns_page.content), ["factorial"]);

        let primary = page(&pages, &store.get("fact").unwrap().url);
        assert_eq!(primary.title, "factorial");
        assert_eq!(link_texts(&primary.content), ["factorial< 0 >"]);
        assert!(primary
            .content
            .find_all(&|e| e.tag == "h3")
            .iter()
            .any(|h| h.text() == "Template Specializations"));

        let special = page(&pages, &store.get("fact0").unwrap().url);
        assert!(special
            .sidebar
            .sections
            .iter()
            .any(|s| s.title == "Template Specializations"));
    }

    #[test]
    fn test_protected_and_private_sections() {
        let mut prot = entity("prot", EntityKind::Function, "helper", &[]);
        prot.visibility = Visibility::Protected;
        let mut private = entity("priv", EntityKind::Function, "secret", &[]);
        private.visibility = Visibility::Private;
        let store = resolved(vec![
            entity("cls", EntityKind::Class, "C", &["prot", "priv"]),
            prot,
            private,
        ]);

        let pages = partition(&store, &GeneratorConfig::default());
        let class_page = page(&pages, &store.get("cls").unwrap().url);
        assert_eq!(link_texts(&class_page.content), ["helper"]);
        assert!(class_page
            .content
            .find_all(&|e| e.tag == "h3")
            .iter()
            .any(|h| h.text() == "Protected Functions"));
        assert!(!pages.iter().any(|p| p.url == store.get("priv").unwrap().url));

        let config = GeneratorConfig {
            show_private: true,
            ..GeneratorConfig::default()
        };
        let pages = partition(&store, &config);
        let class_page = page(&pages, &store.get("cls").unwrap().url);
        assert_eq!(link_texts(&class_page.content), ["helper", "secret"]);
    }

    #[test]
    fn test_breadcrumbs_and_sidebars() {
        let store = resolved(vec![
            entity("ns", EntityKind::Namespace, "demo", &["cls"]),
            entity("cls", EntityKind::Class, "demo::parent", &["fn"]),
            entity("fn", EntityKind::Function, "foo", &[]),
        ]);
        let pages = partition(&store, &GeneratorConfig::default());

        let root = page(&pages, "index.html");
        assert_eq!(root.title, "Index");
        assert_eq!(root.sidebar.heading, SidebarHeading::Title("Navigation".to_string()));

        let fn_page = page(&pages, &store.get("fn").unwrap().url);
        let caption = fn_page.content.find_all(&|e| e.attr("class") == Some("page-caption"));
        assert_eq!(caption[0].text(), "demo::parent::foo");
        match &fn_page.sidebar.heading {
            SidebarHeading::Up(link) => assert_eq!(link.title, "parent"),
            other => panic!("unexpected heading {:?}", other),
        }
        assert_eq!(fn_page.sidebar.sections[0].title, "Public Functions");
    }

    #[test]
    fn test_each_url_emitted_once() {
        let store = resolved(vec![
            entity("dir", EntityKind::Dir, "include", &["file"]),
            entity("file", EntityKind::File, "demo.h", &[]),
        ]);
        let pages = partition(&store, &GeneratorConfig::default());
        let urls: HashSet<&str> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls.len(), pages.len());
        assert_eq!(pages.len(), 3);

        let dir_page = page(&pages, &store.get("dir").unwrap().url);
        assert_eq!(link_texts(&dir_page.content), ["demo.h"]);
        let file_page = page(&pages, &store.get("file").unwrap().url);
        let caption = file_page.content.find_all(&|e| e.attr("class") == Some("page-caption"));
        assert_eq!(caption[0].text(), "include/demo.h");
    }

    #[test]
    fn test_include_block_links_known_files() {
        let file = entity("file", EntityKind::File, "demo.h", &[]);
        let mut cls = entity("cls", EntityKind::Class, "C", &[]);
        cls.includes.push(IncludeRef {
            refid: Some("file".to_string()),
            text: "demo.h".to_string(),
        });
        cls.includes.push(IncludeRef {
            refid: None,
            text: "other.h".to_string(),
        });
        let store = resolved(vec![file, cls]);
        let pages = partition(&store, &GeneratorConfig::default());
        let class_page = page(&pages, &store.get("cls").unwrap().url);
        let include = class_page.content.find_all(&|e| e.attr("class") == Some("include"));
        assert_eq!(include.len(), 1);
        assert_eq!(include[0].text(), "#include <demo.h>#include <other.h>");
        let links = include[0].find_all(&|e| e.attr("href").is_some());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].attr("href"), Some(store.get("file").unwrap().url.as_str()));
    }
}
