//! Configuration module

pub mod menu;
mod search;
mod site;

pub use menu::MenuEntry;
pub use search::{FuseConfig, SearchConfig, INDEXABLE_KEYS};
pub use site::{Params, SiteConfig, REQUIRED_KEYS};
