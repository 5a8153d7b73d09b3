//! Client-side search settings (`params.search`)
//!
//! Only the configuration is modelled here; the index itself is built by
//! the external generator and queried by a fuzzy-search library in the
//! browser.

use serde::{Deserialize, Serialize};

/// Fields the search index is allowed to cover
pub const INDEXABLE_KEYS: [&str; 4] = ["title", "permalink", "summary", "content"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub enable: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub content_length: usize,
    pub placeholder: String,
    pub max_result_length: usize,
    pub snippet_length: usize,
    pub highlight_tag: String,
    pub absolute_url: bool,
    pub fuse: FuseConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enable: true,
            kind: "fuse".to_string(),
            content_length: 4000,
            placeholder: String::new(),
            max_result_length: 10,
            snippet_length: 30,
            highlight_tag: "em".to_string(),
            absolute_url: false,
            fuse: FuseConfig::default(),
        }
    }
}

/// Fuzzy matcher options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuseConfig {
    pub is_case_sensitive: bool,
    pub should_sort: bool,
    pub location: i64,
    pub distance: i64,
    pub threshold: f64,
    pub min_match_char_length: i64,
    pub ignore_location: bool,
    pub use_extended_search: bool,
    pub keys: Vec<String>,
}

impl Default for FuseConfig {
    fn default() -> Self {
        Self {
            is_case_sensitive: false,
            should_sort: true,
            location: 0,
            distance: 100,
            threshold: 0.3,
            min_match_char_length: 2,
            ignore_location: false,
            use_extended_search: false,
            keys: INDEXABLE_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl FuseConfig {
    /// Configured keys outside the indexable set
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.keys
            .iter()
            .map(String::as_str)
            .filter(|k| !INDEXABLE_KEYS.contains(k))
            .collect()
    }
}
