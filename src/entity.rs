//! Documented entities and the store that owns them.

use crate::content::Content;
use indexmap::{IndexMap, IndexSet};
use std::fmt;

pub type EntityId = String;

/// Id of the synthetic root. Extractor ids never contain `:`.
pub const ROOT_ID: &str = "::root";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Typedef,
    Function,
    Variable,
    Define,
    File,
    Dir,
    Group,
    Page,
    Root,
    Other(String),
}

impl EntityKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "namespace" => EntityKind::Namespace,
            "class" => EntityKind::Class,
            "struct" => EntityKind::Struct,
            "union" => EntityKind::Union,
            "enum" => EntityKind::Enum,
            "typedef" => EntityKind::Typedef,
            "function" => EntityKind::Function,
            "variable" => EntityKind::Variable,
            "define" => EntityKind::Define,
            "file" => EntityKind::File,
            "dir" => EntityKind::Dir,
            "group" => EntityKind::Group,
            "page" => EntityKind::Page,
            "root" => EntityKind::Root,
            other => EntityKind::Other(other.to_string()),
        }
    }

    /// The extractor's spelling of the kind; slugs are built from it.
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Namespace => "namespace",
            EntityKind::Class => "class",
            EntityKind::Struct => "struct",
            EntityKind::Union => "union",
            EntityKind::Enum => "enum",
            EntityKind::Typedef => "typedef",
            EntityKind::Function => "function",
            EntityKind::Variable => "variable",
            EntityKind::Define => "define",
            EntityKind::File => "file",
            EntityKind::Dir => "dir",
            EntityKind::Group => "group",
            EntityKind::Page => "page",
            EntityKind::Root => "root",
            EntityKind::Other(kind) => kind,
        }
    }

    /// Listed members of these kinds are not scoping children.
    pub fn is_collection(&self) -> bool {
        matches!(self, EntityKind::Group | EntityKind::Page | EntityKind::File)
    }

    /// Documented on the owner's page instead of a page of their own.
    pub fn is_inline_doc(&self) -> bool {
        matches!(
            self,
            EntityKind::Typedef | EntityKind::Variable | EntityKind::Define
        )
    }

    pub fn is_record(&self) -> bool {
        matches!(
            self,
            EntityKind::Class | EntityKind::Struct | EntityKind::Union
        )
    }

    pub fn is_type(&self) -> bool {
        self.is_record() || matches!(self, EntityKind::Enum | EntityKind::Typedef)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Anything other than protected/private collapses to public.
    pub fn parse(prot: Option<&str>) -> Self {
        match prot {
            Some("protected") => Visibility::Protected,
            Some("private") => Visibility::Private,
            _ => Visibility::Public,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_inline: bool,
    pub is_explicit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseRef {
    pub refid: Option<EntityId>,
    pub text: String,
    pub visibility: Visibility,
    pub is_virtual: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeRef {
    pub refid: Option<EntityId>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub brief: Option<Content>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParam {
    pub type_node: Option<Content>,
    pub declname: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub title: Option<String>,
    pub full_name: String,
    pub visibility: Visibility,
    pub modifiers: Modifiers,
    pub direct_members: IndexSet<EntityId>,
    pub all_members: IndexSet<EntityId>,
    pub bases: Vec<BaseRef>,
    pub includes: Vec<IncludeRef>,
    pub brief: Option<Content>,
    pub detailed: Option<Content>,
    pub enum_values: Vec<EnumValue>,
    pub type_node: Option<Content>,
    pub initializer: Option<Content>,
    pub args: Option<String>,
    pub template_params: Option<Vec<TemplateParam>>,
    pub definition: Option<String>,
    parent: Option<EntityId>,
    pub url: String,
    pub anchor: String,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            kind,
            name: String::new(),
            title: None,
            full_name: String::new(),
            visibility: Visibility::Public,
            modifiers: Modifiers::default(),
            direct_members: IndexSet::new(),
            all_members: IndexSet::new(),
            bases: Vec::new(),
            includes: Vec::new(),
            brief: None,
            detailed: None,
            enum_values: Vec::new(),
            type_node: None,
            initializer: None,
            args: None,
            template_params: None,
            definition: None,
            parent: None,
            url: String::new(),
            anchor: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn is_collection(&self) -> bool {
        self.kind.is_collection()
    }

    pub fn is_inline_doc(&self) -> bool {
        self.kind.is_inline_doc()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Sets the owning parent. Returns false, leaving the entity untouched,
    /// when a parent was already assigned.
    pub fn assign_parent(&mut self, parent: impl Into<EntityId>) -> bool {
        if self.parent.is_some() {
            return false;
        }
        self.parent = Some(parent.into());
        true
    }

    /// Records `member` as owned by this entity.
    pub fn add_direct_member(&mut self, member: impl Into<EntityId>) {
        let member = member.into();
        self.all_members.insert(member.clone());
        self.direct_members.insert(member);
    }
}

/// Every entity of one run, keyed by extractor id, in first-seen order.
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: IndexMap<EntityId, Entity>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Creates a store holding only the synthetic root.
    pub fn new() -> Self {
        let mut entities = IndexMap::new();
        entities.insert(ROOT_ID.to_string(), Entity::new(ROOT_ID, EntityKind::Root));
        Self { entities }
    }

    pub fn root(&self) -> &Entity {
        &self.entities[ROOT_ID]
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Inserts `entity` unless its id is already known. Returns whether it
    /// was inserted; a known id keeps its first record.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.entities.contains_key(&entity.id) {
            return false;
        }
        self.entities.insert(entity.id.clone(), entity);
        true
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn parent_of(&self, id: &str) -> Option<&Entity> {
        self.get(id)
            .and_then(|e| e.parent())
            .and_then(|p| self.get(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_flags() {
        assert!(EntityKind::parse("group").is_collection());
        assert!(EntityKind::parse("file").is_collection());
        assert!(!EntityKind::parse("namespace").is_collection());
        assert!(EntityKind::parse("define").is_inline_doc());
        assert!(!EntityKind::parse("function").is_inline_doc());
        assert_eq!(EntityKind::parse("friend").as_str(), "friend");
        assert_eq!(EntityKind::parse("dir"), EntityKind::Dir);
    }

    #[test]
    fn test_parent_assigned_once() {
        let mut e = Entity::new("a", EntityKind::Class);
        assert!(e.assign_parent("p1"));
        assert!(!e.assign_parent("p2"));
        assert_eq!(e.parent(), Some("p1"));
    }

    #[test]
    fn test_store_keeps_first_record() {
        let mut store = EntityStore::new();
        assert!(store.insert(Entity::new("a", EntityKind::Class).with_name("First")));
        assert!(!store.insert(Entity::new("a", EntityKind::Struct).with_name("Second")));
        assert_eq!(store.get("a").unwrap().name, "First");
        assert_eq!(store.len(), 2);
        assert_eq!(store.root().kind, EntityKind::Root);
    }

    #[test]
    fn test_visibility_collapses_to_public() {
        assert_eq!(Visibility::parse(Some("package")), Visibility::Public);
        assert_eq!(Visibility::parse(None), Visibility::Public);
        assert_eq!(Visibility::parse(Some("private")), Visibility::Private);
    }
}
