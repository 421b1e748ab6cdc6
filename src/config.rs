//! Generator configuration and the localization table.
//!
//! Both are static lookups for the duration of a run. They can be supplied
//! through an optional TOML file:
//!
//! ```toml
//! show_protected = true
//! show_private = false
//!
//! [locale]
//! groups = "Module"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{BuildError, BuildResult};

lazy_static::lazy_static! {
    /// English labels for every key the generator looks up. Keys missing
    /// here are displayed verbatim.
    static ref DEFAULT_LOCALE: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("dirs", "subdirectories");
        m.insert("dir", "Directory");
        m.insert("defines", "preprocessor macros");
        m.insert("define", "preprocessor macro");
        m.insert("group", "module");
        m.insert("groups", "modules");
        m.insert("page", "special page");
        m.insert("pages", "special pages");
        m.insert("headers", "header files");
        m.insert("alindex", "alphabetical index");
        m.insert("returns", "Returns:");
        m.insert("see", "See also:");
        m.insert("parameters", "Parameters:");
        m.insert("exceptions", "Exceptions:");
        m.insert("templateparams", "Template parameters:");
        m.insert("enumvalues", "Enumeration values:");
        m.insert("details", "Details");
        m.insert("specializations", "Template Specializations");
        m.insert("navigation", "Navigation");
        m
    };
}

/// Label lookup with English defaults and user overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Locale {
    overrides: HashMap<String, String>,
}

impl Locale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), label.into());
        self
    }

    /// Returns the label for `key`, or `key` itself when nothing is known.
    pub fn localize(&self, key: &str) -> String {
        if let Some(label) = self.overrides.get(key) {
            return label.clone();
        }
        DEFAULT_LOCALE
            .get(key)
            .map(|label| label.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

fn default_true() -> bool {
    true
}

fn default_stylesheet() -> String {
    "style.css".to_string()
}

fn default_print_stylesheet() -> String {
    "print.css".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Emit protected member sections.
    #[serde(default = "default_true")]
    pub show_protected: bool,
    /// Emit private member sections.
    #[serde(default)]
    pub show_private: bool,
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    #[serde(default = "default_print_stylesheet")]
    pub print_stylesheet: String,
    #[serde(default)]
    pub locale: Locale,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            show_protected: true,
            show_private: false,
            stylesheet: default_stylesheet(),
            print_stylesheet: default_print_stylesheet(),
            locale: Locale::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GeneratorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BuildResult<()> {
        for (key, value) in [
            ("stylesheet", &self.stylesheet),
            ("print_stylesheet", &self.print_stylesheet),
        ] {
            if value.trim().is_empty() {
                return Err(BuildError::Config(format!("`{}` must not be empty", key)));
            }
        }
        Ok(())
    }
}

/// Capitalizes the first letter of every word and lower-cases the rest, the
/// way section headings are displayed.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
