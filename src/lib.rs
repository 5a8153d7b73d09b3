//! sitecheck: content and configuration model for a theme-driven blog
//!
//! Rendering belongs to an external static-site generator. This crate
//! loads the site configuration and the posts' front-matter, decides which
//! posts a production build includes, and validates both.

pub mod build;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod validate;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// Configuration file names tried in order
pub const CONFIG_FILES: [&str; 2] = ["config.yaml", "config.yml"];

/// A blog checkout: configuration plus content tree
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Configuration file, when one was found
    pub config_path: Option<PathBuf>,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
}

impl Site {
    /// Open a site, looking for the default configuration files
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        Self::open(base_dir, None)
    }

    /// Open a site with an explicit configuration file (relative to `base_dir`)
    pub fn open<P: AsRef<Path>>(base_dir: P, config_file: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let config_path = match config_file {
            Some(file) => Some(base_dir.join(file)),
            None => CONFIG_FILES
                .iter()
                .map(|name| base_dir.join(name))
                .find(|path| path.exists()),
        };

        let config = match &config_path {
            Some(path) => config::SiteConfig::load(path)?,
            None => {
                tracing::debug!("No configuration file in {:?}, using defaults", base_dir);
                config::SiteConfig::default()
            }
        };

        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            config_path,
            base_dir,
            content_dir,
        })
    }

    /// Load every post under the content directory
    pub fn load_content(&self) -> content::LoadedContent {
        content::ContentLoader::new(self).load_posts()
    }

    /// Validate configuration and content, returning what was loaded
    /// alongside the findings
    pub fn check(&self) -> (content::LoadedContent, validate::Report) {
        let loaded = self.load_content();
        let report = validate::check_site(self, &loaded);
        (loaded, report)
    }
}
