//! Navigation menus

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One navigation entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuEntry {
    pub identifier: String,
    pub name: String,
    pub url: String,
    /// Zero means "unweighted"
    pub weight: i64,
    pub pre: Option<String>,
    pub post: Option<String>,
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Entries sorted by weight, then name, then identifier.
///
/// Unweighted (zero) entries come after weighted ones.
pub fn ordered(entries: &[MenuEntry]) -> Vec<&MenuEntry> {
    let mut sorted: Vec<&MenuEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
}

fn compare(a: &MenuEntry, b: &MenuEntry) -> Ordering {
    let by_weight = match (a.weight, b.weight) {
        (0, 0) => Ordering::Equal,
        (0, _) => Ordering::Greater,
        (_, 0) => Ordering::Less,
        (x, y) => x.cmp(&y),
    };
    by_weight
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.identifier.cmp(&b.identifier))
}
