//! Ownership hierarchy resolution.
//!
//! Every entity ends up with exactly one parent. Ownership comes from the
//! extractor's containment edges (`direct_members`) of non-collection
//! entities; whatever is left over is attached to its enclosing namespace
//! (namespaces are emitted flat, one record per qualified name) or to the
//! synthetic root.

use log::debug;
use std::collections::HashMap;

use crate::entity::{EntityId, EntityKind, EntityStore, ROOT_ID};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    /// Entities whose parent came from a containment edge.
    pub claimed: usize,
    /// Entities attached after the ownership walk.
    pub orphans: usize,
    /// Nested namespaces whose enclosing namespace could not be found.
    pub namespace_fallbacks: usize,
}

/// Assigns parents. Holds the namespace name table for one run.
#[derive(Debug, Default)]
pub struct HierarchyResolver {
    namespaces: HashMap<String, EntityId>,
    stats: HierarchyStats,
}

impl HierarchyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(mut self, store: &mut EntityStore) -> HierarchyStats {
        let ids = store.ids();

        for id in ids.iter().filter(|id| id.as_str() != ROOT_ID) {
            let Some(entity) = store.get(id) else {
                continue;
            };
            if entity.kind == EntityKind::Namespace {
                self.namespaces.insert(entity.name.clone(), id.clone());
            }
            self.claim_members(store, id);
        }

        for id in ids.iter().filter(|id| id.as_str() != ROOT_ID) {
            let orphan = store.get(id).map_or(false, |e| e.parent().is_none());
            if !orphan {
                continue;
            }
            let new_parent = self.new_parent(store, id);
            if let Some(entity) = store.get_mut(id) {
                entity.assign_parent(new_parent.clone());
            }
            if let Some(parent) = store.get_mut(&new_parent) {
                parent.all_members.insert(id.clone());
            }
            self.stats.orphans += 1;
        }

        inherit_includes(store);
        self.stats
    }

    /// Depth-first walk over `owner`'s containment edges. An ancestor of
    /// `owner` (or `owner` itself) is never claimed, so no parent cycle forms.
    fn claim_members(&mut self, store: &mut EntityStore, owner: &str) {
        let Some(entity) = store.get(owner) else {
            return;
        };
        if entity.is_collection() {
            return;
        }
        let members: Vec<EntityId> = entity.direct_members.iter().cloned().collect();

        for member in members {
            if is_ancestor_or_self(store, &member, owner) {
                continue;
            }
            let claimed = store
                .get_mut(&member)
                .map_or(false, |m| m.assign_parent(owner));
            if !claimed {
                continue;
            }
            self.stats.claimed += 1;
            self.claim_members(store, &member);
        }
    }

    fn new_parent(&mut self, store: &EntityStore, id: &str) -> EntityId {
        let Some(entity) = store.get(id) else {
            return ROOT_ID.to_string();
        };
        if entity.kind == EntityKind::Namespace {
            if let Some(pos) = entity.name.rfind("::") {
                let scope = &entity.name[..pos];
                match self.namespaces.get(scope) {
                    Some(parent) if parent != id && store.contains(parent) => {
                        return parent.clone();
                    }
                    _ => {
                        debug!(
                            "Enclosing namespace '{}' of '{}' not found, attaching to root",
                            scope, entity.name
                        );
                        self.stats.namespace_fallbacks += 1;
                    }
                }
            }
        }
        ROOT_ID.to_string()
    }
}

fn is_ancestor_or_self(store: &EntityStore, candidate: &str, of: &str) -> bool {
    let mut current = Some(of);
    // Bounded by the store size in case the chain is already broken.
    for _ in 0..store.len() {
        match current {
            Some(id) if id == candidate => return true,
            Some(id) => current = store.get(id).and_then(|e| e.parent()),
            None => return false,
        }
    }
    false
}

/// Entities without include references take their parent's, top-down from
/// the root so inherited references propagate through several levels.
fn inherit_includes(store: &mut EntityStore) {
    let mut children: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
    for entity in store.iter() {
        if let Some(parent) = entity.parent() {
            children
                .entry(parent.to_string())
                .or_default()
                .push(entity.id.clone());
        }
    }

    let mut stack = vec![ROOT_ID.to_string()];
    while let Some(id) = stack.pop() {
        let Some(kids) = children.get(&id) else {
            continue;
        };
        let includes = store.get(&id).map(|e| e.includes.clone()).unwrap_or_default();
        for kid in kids {
            if let Some(child) = store.get_mut(kid) {
                if child.includes.is_empty() {
                    child.includes = includes.clone();
                }
            }
            stack.push(kid.clone());
        }
    }
}

/// Runs hierarchy resolution with a fresh resolver.
pub fn resolve_hierarchy(store: &mut EntityStore) -> HierarchyStats {
    HierarchyResolver::new().resolve(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, IncludeRef};

    fn entity(id: &str, kind: EntityKind, name: &str, members: &[&str]) -> Entity {
        let mut e = Entity::new(id, kind).with_name(name);
        for m in members {
            e.add_direct_member(*m);
        }
        e
    }

    #[test]
    fn test_every_entity_gets_one_parent() {
        let mut store = EntityStore::new();
        store.insert(entity("ns", EntityKind::Namespace, "demo", &["cls"]));
        store.insert(entity("cls", EntityKind::Class, "demo::parent", &["fn"]));
        store.insert(entity("fn", EntityKind::Function, "foo", &[]));
        store.insert(entity("file", EntityKind::File, "demo.h", &["cls", "fn"]));

        let stats = resolve_hierarchy(&mut store);

        assert_eq!(store.get("cls").unwrap().parent(), Some("ns"));
        assert_eq!(store.get("fn").unwrap().parent(), Some("cls"));
        assert_eq!(store.get("ns").unwrap().parent(), Some(ROOT_ID));
        // Files list members but never own them.
        assert_eq!(store.get("file").unwrap().parent(), Some(ROOT_ID));
        assert!(store.root().parent().is_none());
        assert!(store.root().all_members.contains("ns"));
        assert!(store.root().all_members.contains("file"));
        assert_eq!(stats.claimed, 2);
        assert_eq!(stats.orphans, 2);
    }

    #[test]
    fn test_nested_namespace_attaches_to_enclosing() {
        let mut store = EntityStore::new();
        store.insert(entity("inner", EntityKind::Namespace, "outer::inner", &[]));
        store.insert(entity("outer", EntityKind::Namespace, "outer", &[]));

        resolve_hierarchy(&mut store);

        assert_eq!(store.get("inner").unwrap().parent(), Some("outer"));
        assert!(store.get("outer").unwrap().all_members.contains("inner"));
        assert!(!store.root().all_members.contains("inner"));
    }

    #[test]
    fn test_unresolvable_namespace_falls_back_to_root() {
        let mut store = EntityStore::new();
        store.insert(entity("inner", EntityKind::Namespace, "missing::inner", &[]));

        let stats = resolve_hierarchy(&mut store);

        assert_eq!(store.get("inner").unwrap().parent(), Some(ROOT_ID));
        assert_eq!(stats.namespace_fallbacks, 1);
    }

    #[test]
    fn test_member_cycle_does_not_loop() {
        let mut store = EntityStore::new();
        store.insert(entity("a", EntityKind::Class, "A", &["b"]));
        store.insert(entity("b", EntityKind::Class, "B", &["a"]));

        resolve_hierarchy(&mut store);

        assert_eq!(store.get("b").unwrap().parent(), Some("a"));
        assert_eq!(store.get("a").unwrap().parent(), Some(ROOT_ID));
    }

    #[test]
    fn test_includes_are_inherited_top_down() {
        let mut store = EntityStore::new();
        let mut cls = entity("cls", EntityKind::Class, "C", &["nested"]);
        cls.includes.push(IncludeRef {
            refid: Some("file".to_string()),
            text: "c.h".to_string(),
        });
        store.insert(cls);
        store.insert(entity("nested", EntityKind::Struct, "C::N", &["fn"]));
        store.insert(entity("fn", EntityKind::Function, "f", &[]));

        resolve_hierarchy(&mut store);

        assert_eq!(store.get("nested").unwrap().includes[0].text, "c.h");
        assert_eq!(store.get("fn").unwrap().includes[0].text, "c.h");
    }
}
