//! Declaration blocks shown at the top of each entity's documentation.

use std::collections::HashSet;

use crate::entity::{Entity, EntityKind, EntityStore};
use crate::html::Element;
use crate::renderer::{ContentRenderer, LinkMode};

/// Functions and variables whose leading text is longer than this get the
/// name on a line of its own.
const FUNC_VAR_BREAK_AT: usize = 20;
/// Same, for `using name = type` with the name and type together.
const TYPEDEF_BREAK_AT: usize = 30;

const BASE_INDENT: &str = "\u{a0}\u{a0}\u{a0}\u{a0}";

fn span(class: &str) -> Element {
    Element::new("span").with_class(class)
}

/// Marks `dest` as a declaration and adds the `template <...>` line when the
/// entity is a template.
pub fn template_header(renderer: &ContentRenderer<'_>, entity: &Entity, dest: &mut Element) {
    dest.set_attr("class", "decl");
    let Some(params) = &entity.template_params else {
        return;
    };
    let header = dest.push_element(span("template"));
    header.push_text("template <");
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            header.push_text(", ");
        }
        if let Some(type_node) = &param.type_node {
            let ty = header.push_element(Element::new("span"));
            renderer.render(type_node, ty, LinkMode::Linked);
        }
        if let Some(name) = &param.declname {
            header.push_text(" ");
            header.push(Element::new("span").with_text(name.as_str()));
        }
    }
    header.push(Element::new("span").with_text(">"));
    dest.push(Element::new("br"));
}

/// Function, variable or macro declaration. Abbreviated declarations
/// collapse template arguments and leave out the initializer.
pub fn func_var_decl(
    renderer: &ContentRenderer<'_>,
    entity: &Entity,
    dest: &mut Element,
    links: LinkMode,
    abbreviated: bool,
) {
    template_header(renderer, entity, dest);

    let mut specs = String::new();
    if entity.modifiers.is_explicit {
        specs.push_str("explicit ");
    }
    if entity.modifiers.is_static {
        specs.push_str("static ");
    }
    if entity.modifiers.is_virtual {
        specs.push_str("virtual ");
    }
    let mut length = specs.len();
    dest.push(span("specs").with_text(specs));

    let ty = dest.push_element(span("type"));
    if entity.kind == EntityKind::Define {
        ty.push_text("#define");
        length += "#define".len();
    } else if let Some(type_node) = &entity.type_node {
        length += if abbreviated {
            renderer.render_abbreviated(type_node, ty, links)
        } else {
            renderer.render(type_node, ty, links)
        };
    }
    dest.push_text(" ");
    if length > FUNC_VAR_BREAK_AT {
        dest.push(Element::new("br"));
    }

    dest.push(span("name").with_text(entity.name.as_str()));
    if let Some(args) = &entity.args {
        let arglist = dest.push_element(span("arglist"));
        renderer.render_str(args, arglist, abbreviated);
    }
    if let Some(initializer) = entity.initializer.as_ref().filter(|_| !abbreviated) {
        let init = dest.push_element(span("init"));
        init.push_text(" ");
        renderer.render(initializer, init, links);
    }
}

/// `using name = type`, broken after the name when the line gets long.
pub fn typedef_decl(renderer: &ContentRenderer<'_>, entity: &Entity, dest: &mut Element) {
    template_header(renderer, entity, dest);
    dest.push(span("specs").with_text("using "));
    dest.push(span("name").with_text(entity.name.as_str()));

    let mut ty = span("type");
    let length = entity
        .type_node
        .as_ref()
        .map_or(0, |t| renderer.render(t, &mut ty, LinkMode::Linked));
    if length + entity.name.chars().count() > TYPEDEF_BREAK_AT {
        dest.push(Element::new("br"));
    }
    dest.push(Element::new("span").with_text(" = "));
    dest.push(ty);
}

pub fn define_decl(renderer: &ContentRenderer<'_>, entity: &Entity, dest: &mut Element) {
    func_var_decl(renderer, entity, dest, LinkMode::Linked, false);
}

/// Class, struct or union header with one line per base.
pub fn struct_decl(renderer: &ContentRenderer<'_>, entity: &Entity, dest: &mut Element) {
    template_header(renderer, entity, dest);
    let keyword = renderer.locale().localize(entity.kind.as_str());
    dest.push(span("specs").with_text(format!("{} ", keyword)));
    dest.push(span("name").with_text(entity.name.as_str()));

    for (i, base) in entity.bases.iter().enumerate() {
        dest.push(Element::new("br"));
        let mut prefix = format!(
            "{}{}{} ",
            BASE_INDENT,
            if i == 0 { ": " } else { ", " },
            base.visibility.as_str()
        );
        if base.is_virtual {
            prefix.push_str("virtual ");
        }
        dest.push(Element::new("span").with_text(prefix));
        match renderer.resolve_ref(base.refid.as_deref()) {
            Some(url) => dest.push(Element::new("a").with_attr("href", url).with_text(base.text.as_str())),
            None => dest.push(Element::new("span").with_text(base.text.as_str())),
        }
    }
}

/// Names of `entity` and of every base it transitively derives from. Members
/// carrying one of these names are constructors.
pub fn base_names(store: &EntityStore, entity: &Entity) -> HashSet<String> {
    let mut names = HashSet::new();
    let mut visited = HashSet::new();
    collect_base_names(store, entity, &mut names, &mut visited);
    names
}

fn collect_base_names<'a>(
    store: &'a EntityStore,
    entity: &'a Entity,
    names: &mut HashSet<String>,
    visited: &mut HashSet<&'a str>,
) {
    if !visited.insert(entity.id.as_str()) {
        return;
    }
    names.insert(entity.name.clone());
    for base in &entity.bases {
        if let Some(base) = base.refid.as_deref().and_then(|id| store.get(id)) {
            collect_base_names(store, base, names, visited);
        }
    }
}
