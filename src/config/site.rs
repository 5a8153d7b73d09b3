//! Site configuration (config.yaml)

use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::menu::{self, MenuEntry};
use super::search::SearchConfig;
use crate::error::{Error, Result};

/// Top-level keys every site configuration must declare
pub const REQUIRED_KEYS: [&str; 4] = ["baseURL", "title", "params", "menu"];

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub title: String,
    pub theme: String,
    pub language_code: String,
    pub time_zone: String,

    // Content
    pub content_dir: String,
    pub build_future: bool,
    pub build_drafts: bool,
    pub paginate: usize,

    pub params: Params,

    /// Named menus, e.g. `main`
    pub menu: IndexMap<String, Vec<MenuEntry>>,

    /// Page kind -> output formats
    pub outputs: IndexMap<String, Vec<String>>,

    /// Top-level keys as written in the source document
    #[serde(skip)]
    pub declared_keys: Vec<String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://example.org/".to_string(),
            title: "My Blog".to_string(),
            theme: String::new(),
            language_code: "en".to_string(),
            time_zone: String::new(),

            content_dir: "content".to_string(),
            build_future: false,
            build_drafts: false,
            paginate: 10,

            params: Params::default(),
            menu: IndexMap::new(),
            outputs: IndexMap::new(),
            declared_keys: Vec::new(),
            extra: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_yaml(&content).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded site config from {:?}", path);
        Ok(config)
    }

    /// Parse a configuration document, remembering which keys it declared
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let declared_keys = match &raw {
            serde_yaml::Value::Mapping(map) => map
                .keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        // An empty document deserializes to all defaults
        let mut config: SiteConfig = if raw.is_null() {
            SiteConfig::default()
        } else {
            serde_yaml::from_value(raw)?
        };
        config.declared_keys = declared_keys;
        Ok(config)
    }

    /// Required top-level keys absent from the source document
    pub fn missing_required_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| !self.declared_keys.iter().any(|k| k == key))
            .collect()
    }

    /// Time zone used for front-matter dates without an offset
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.time_zone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|_| Error::Timezone(name.to_string()))
    }

    /// Entries of a named menu in display order
    pub fn menu_entries(&self, name: &str) -> Vec<&MenuEntry> {
        self.menu
            .get(name)
            .map(|entries| menu::ordered(entries))
            .unwrap_or_default()
    }

    /// Output formats configured for a page kind (`home`, `page`, ...)
    pub fn output_formats(&self, kind: &str) -> &[String] {
        self.outputs.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Search block, if the theme parameters declare one
    pub fn search(&self) -> Option<&SearchConfig> {
        self.params.search.as_ref()
    }
}

/// Theme parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub description: Option<String>,
    pub author: Option<serde_yaml::Value>,
    pub search: Option<SearchConfig>,
    /// Social network handles keyed by network name
    pub social: IndexMap<String, serde_yaml::Value>,

    /// Display toggles and other theme-specific values
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Params {
    /// Look up a boolean display toggle such as `showWordCount`
    pub fn toggle(&self, name: &str) -> Option<bool> {
        self.extra.get(name).and_then(serde_yaml::Value::as_bool)
    }
}
