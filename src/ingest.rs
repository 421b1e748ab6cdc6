//! Reads extractor records into the entity store.
//!
//! A record file holds `<compounddef>`s, each with nested `<memberdef>`s,
//! containment references and an optional full-member listing. The first
//! record seen for an id creates the entity; later records for the same id
//! only contribute member edges.

use log::{debug, info, warn};
use std::path::Path;
use walkdir::WalkDir;

use crate::content::Content;
use crate::entity::{
    BaseRef, Entity, EntityId, EntityKind, EntityStore, EnumValue, IncludeRef, Modifiers,
    TemplateParam, Visibility,
};
use crate::error::{BuildError, BuildResult};
use crate::xml::{self, XmlElement};

/// Accumulates records into an `EntityStore`.
#[derive(Debug, Default)]
pub struct Ingestor {
    store: EntityStore,
    files_read: usize,
}

impl Ingestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_read(&self) -> usize {
        self.files_read
    }

    pub fn finish(self) -> EntityStore {
        self.store
    }

    /// Reads every `*.xml` file directly inside `dir`, in file-name order.
    pub fn read_directory(&mut self, dir: &Path) -> BuildResult<()> {
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| BuildError::io(dir, e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("xml")
            {
                continue;
            }
            self.read_file(path)?;
        }
        info!(
            "Read {} record files, {} entities",
            self.files_read,
            self.store.len() - 1
        );
        Ok(())
    }

    pub fn read_file(&mut self, path: &Path) -> BuildResult<()> {
        let source = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        let root = xml::parse_document(&source).map_err(|source| BuildError::Xml {
            path: path.to_path_buf(),
            source,
        })?;
        self.files_read += 1;
        let Some(root) = root else {
            return Err(BuildError::MalformedRecord {
                path: path.to_path_buf(),
                message: "document has no root element".to_string(),
            });
        };
        self.read_document(&root);
        debug!("Ingested {}", path.display());
        Ok(())
    }

    /// Reads the `<compounddef>`s of a parsed `<doxygen>` document. Other
    /// document types (such as the extractor's index) contribute nothing.
    pub fn read_document(&mut self, root: &XmlElement) {
        if root.name != "doxygen" {
            return;
        }
        for compound in root.elements_named("compounddef") {
            self.read_compound(compound);
        }
    }

    fn read_compound(&mut self, compound: &XmlElement) {
        let Some(id) = self.read_definition(compound, None) else {
            warn!("Skipping <compounddef> without an id");
            return;
        };
        let is_collection = self
            .store
            .get(&id)
            .map(Entity::is_collection)
            .unwrap_or(false);

        for child in compound.elements() {
            match child.name.as_str() {
                "innerclass" | "innerfile" | "innerdir" => {
                    if let (Some(member), Some(owner)) =
                        (child.attr("refid"), self.store.get_mut(&id))
                    {
                        owner.add_direct_member(member);
                    }
                }
                "sectiondef" => {
                    for member in child.elements_named("memberdef") {
                        self.read_definition(member, Some(id.as_str()));
                    }
                }
                "listofallmembers" if !is_collection => {
                    let listed: Vec<&str> = child
                        .elements_named("member")
                        .filter_map(|m| m.attr("refid"))
                        .collect();
                    if let Some(owner) = self.store.get_mut(&id) {
                        for member in listed {
                            owner.all_members.insert(member.to_string());
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Reads a `<compounddef>` or `<memberdef>`, registering it with `owner`.
    fn read_definition(&mut self, element: &XmlElement, owner: Option<&str>) -> Option<EntityId> {
        let id = element.attr("id")?.to_string();
        if let Some(owner) = owner.and_then(|o| self.store.get_mut(o)) {
            owner.add_direct_member(id.clone());
        }
        if !self.store.contains(&id) {
            let entity = entity_from_element(&id, element);
            self.store.insert(entity);
        }
        Some(id)
    }
}

fn flag(element: &XmlElement, name: &str) -> bool {
    element.attr(name) == Some("yes")
}

fn entity_from_element(id: &str, element: &XmlElement) -> Entity {
    let kind = EntityKind::parse(element.attr("kind").unwrap_or("none"));
    let mut entity = Entity::new(id, kind.clone());
    entity.visibility = Visibility::parse(element.attr("prot"));
    entity.modifiers = Modifiers {
        is_static: flag(element, "static"),
        is_virtual: element.attr("virt").map_or(false, |v| v == "virtual" || v == "pure-virtual")
            || flag(element, "virtual"),
        is_inline: flag(element, "inline"),
        is_explicit: flag(element, "explicit"),
    };

    let mut macro_params: Vec<String> = Vec::new();
    for child in element.elements() {
        match child.name.as_str() {
            "name" | "compoundname" => entity.name = child.text(),
            "title" => entity.title = Some(child.text()),
            "type" => entity.type_node = Some(Content::from_element(child)),
            "definition" => entity.definition = Some(child.text()),
            "argsstring" => entity.args = Some(child.text()),
            "briefdescription" => entity.brief = Content::from_optional(child),
            "detaileddescription" => entity.detailed = Content::from_optional(child),
            "initializer" => entity.initializer = Some(Content::from_element(child)),
            "includes" => entity.includes.push(IncludeRef {
                refid: child.attr("refid").map(str::to_string),
                text: child.text(),
            }),
            "templateparamlist" => {
                entity.template_params = Some(
                    child
                        .elements_named("param")
                        .map(|param| TemplateParam {
                            type_node: param.first("type").map(Content::from_element),
                            declname: param
                                .first("declname")
                                .or_else(|| param.first("defname"))
                                .map(XmlElement::text),
                        })
                        .collect(),
                )
            }
            "enumvalue" => entity.enum_values.push(EnumValue {
                name: child.first("name").map(XmlElement::text).unwrap_or_default(),
                brief: child.first("briefdescription").and_then(Content::from_optional),
            }),
            "basecompoundref" => entity.bases.push(BaseRef {
                refid: child.attr("refid").map(str::to_string),
                text: child.text(),
                visibility: Visibility::parse(child.attr("prot")),
                is_virtual: child.attr("virt") == Some("virtual"),
            }),
            "param" if kind == EntityKind::Define => {
                if let Some(defname) = child.first("defname") {
                    macro_params.push(defname.text());
                }
            }
            _ => {}
        }
    }
    if !macro_params.is_empty() {
        entity.args = Some(format!("({})", macro_params.join(", ")));
    }
    entity
}

/// Convenience for reading a whole input directory into a fresh store.
pub fn ingest_directory(dir: &Path) -> BuildResult<EntityStore> {
    let mut ingestor = Ingestor::new();
    ingestor.read_directory(dir)?;
    Ok(ingestor.finish())
}
