//! Display names, qualified names, slugs and URLs.
//!
//! URLs are the compatibility surface of the generated site: for a given
//! input they must come out bit-identical, so everything here is a pure
//! function of an entity's kind and qualified name.

use log::debug;
use md5::{Digest, Md5};
use std::collections::HashSet;

use crate::entity::{EntityId, EntityKind, EntityStore, ROOT_ID};

/// Label used for unnamed entities.
pub const ANONYMOUS: &str = "(anonymous)";

/// Marker the extractor puts in front of generated names of unnamed scopes.
const ANONYMOUS_MARKER: char = '@';

const HASH_LEN: usize = 4;

/// Angle-bracket depth of a template argument list being scanned. A `>`
/// without a matching `<` leaves the depth at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDepth {
    depth: usize,
}

impl TemplateDepth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn open(&mut self) -> usize {
        self.depth += 1;
        self.depth
    }

    /// Returns false for an unmatched `>`.
    pub fn close(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        self.depth -= 1;
        true
    }
}

/// Last scope segment of `name`. Separators inside template argument lists
/// do not count: `Outer<A::B>::Inner` yields `Inner`.
pub fn short_name(name: &str) -> &str {
    if !name.contains("::") {
        return name;
    }
    let mut depth = TemplateDepth::new();
    let mut start = 0;
    for (i, c) in name.char_indices() {
        match c {
            '<' => {
                depth.open();
            }
            '>' => {
                depth.close();
            }
            ':' if depth.depth() == 0 => start = i + c.len_utf8(),
            _ => {}
        }
    }
    &name[start..]
}

/// Normalizes a raw extractor name for display.
pub fn normalize_name(raw: &str, kind: &EntityKind) -> String {
    if raw.starts_with(ANONYMOUS_MARKER) {
        return ANONYMOUS.to_string();
    }
    let name = short_name(raw);
    if *kind == EntityKind::Dir && !name.ends_with('/') {
        return format!("{}/", name);
    }
    name.to_string()
}

/// Qualified name of a child of a parent with `parent_full_name`.
pub fn compose_full_name(parent_full_name: &str, name: &str, kind: &EntityKind) -> String {
    if parent_full_name.is_empty() || matches!(kind, EntityKind::File | EntityKind::Dir) {
        format!("{}{}", parent_full_name, name)
    } else {
        format!("{}::{}", parent_full_name, name)
    }
}

/// First hex digits of the MD5 of `text`.
pub fn short_hash(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..HASH_LEN].to_string()
}

/// URL-safe form of an arbitrary string.
///
/// ASCII letters, digits and `_` are kept (lower-cased); each run of anything
/// else becomes a single `-`, with `not-` spelled out for a `~` that opens
/// the run. The result always ends in `-` followed by a short hash of the
/// original text, which keeps names that fold to the same letters apart.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + HASH_LEN + 1);
    let mut in_separator = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        } else if !in_separator {
            out.push('-');
            if c == '~' {
                out.push_str("not-");
            }
            in_separator = true;
        }
    }
    if !in_separator {
        out.push('-');
    }
    out.push_str(&short_hash(text));
    out
}

/// Page identifier for an entity: `kind-slug`, or `index` for the root.
pub fn page_slug(kind: &EntityKind, full_name: &str) -> String {
    if full_name.is_empty() {
        "index".to_string()
    } else {
        format!("{}-{}", kind.as_str(), slugify(full_name))
    }
}

/// Resolves names and URLs for every entity.
///
/// An entity's names depend only on its parent chain, so each entity is
/// finished only after its parent is. Traversal order through member
/// listings never matters.
pub struct NameResolver<'a> {
    store: &'a mut EntityStore,
    resolved: HashSet<EntityId>,
    in_progress: HashSet<EntityId>,
}

impl<'a> NameResolver<'a> {
    pub fn new(store: &'a mut EntityStore) -> Self {
        Self {
            store,
            resolved: HashSet::new(),
            in_progress: HashSet::new(),
        }
    }

    pub fn resolve_all(mut self) {
        self.resolve(ROOT_ID);
        for id in self.store.ids() {
            self.resolve(&id);
        }
        debug!("Resolved names of {} entities", self.resolved.len());
    }

    fn resolve(&mut self, id: &str) {
        if self.resolved.contains(id) || !self.in_progress.insert(id.to_string()) {
            return;
        }
        let Some(parent_id) = self.store.get(id).map(|e| e.parent().map(str::to_string)) else {
            self.in_progress.remove(id);
            return;
        };
        if let Some(parent_id) = &parent_id {
            self.resolve(parent_id);
        }
        let parent = parent_id
            .as_deref()
            .filter(|p| self.resolved.contains(*p))
            .and_then(|p| self.store.get(p));
        if parent.is_none() && parent_id.is_some() {
            debug!("Parent of '{}' is part of a cycle, naming it at top level", id);
        }
        let (parent_full_name, parent_url) = parent
            .map(|p| (p.full_name.clone(), p.url.clone()))
            .unwrap_or_default();

        if let Some(entity) = self.store.get_mut(id) {
            if entity.kind == EntityKind::Root {
                entity.name.clear();
                entity.full_name.clear();
            } else {
                entity.name = normalize_name(&entity.name, &entity.kind);
                entity.full_name = compose_full_name(&parent_full_name, &entity.name, &entity.kind);
            }

            let slug = page_slug(&entity.kind, &entity.full_name);
            if entity.is_inline_doc() {
                entity.url = format!("{}#{}", parent_url, slug);
                entity.anchor = slug;
            } else {
                entity.url = format!("{}.html", slug);
            }
        }
        self.in_progress.remove(id);
        self.resolved.insert(id.to_string());
    }
}

/// Resolves names and URLs of every entity in `store`.
pub fn resolve_names(store: &mut EntityStore) {
    NameResolver::new(store).resolve_all();
}
