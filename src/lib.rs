//! Doxy Ultra
//!
//! Turns the XML records written by Doxygen into a statically linked,
//! multi-page HTML reference with stable, hash-suffixed file names.

pub mod builder;
pub mod config;
pub mod content;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod html;
pub mod ingest;
pub mod naming;
pub mod navigation;
pub mod partition;
pub mod renderer;
pub mod signature;
pub mod theme;
pub mod xml;

pub use builder::{BuildStats, DocBuilder};
pub use config::{GeneratorConfig, Locale};
pub use content::{Content, ContentNode};
pub use entity::{Entity, EntityId, EntityKind, EntityStore, Visibility, ROOT_ID};
pub use error::{BuildError, BuildResult};
pub use hierarchy::{resolve_hierarchy, HierarchyResolver, HierarchyStats};
pub use html::Element;
pub use ingest::{ingest_directory, Ingestor};
pub use naming::{page_slug, resolve_names, slugify, NameResolver};
pub use navigation::{Breadcrumbs, NavLink, NavSection, Sidebar};
pub use partition::{partition, GroupName, MemberCategory, Page, PagePartitioner, SectionKey};
pub use renderer::{abbreviate, ContentRenderer, LinkMode};
pub use theme::Theme;
