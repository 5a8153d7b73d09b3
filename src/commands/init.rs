//! Initialize a new blog checkout

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::helpers::front_matter_date;

const CONFIG: &str = r#"# Site configuration
baseURL: https://example.org/
title: My Blog
languageCode: en
theme: ''
timeZone: ''

buildFuture: false
buildDrafts: false
paginate: 10

params:
  description: ''
  showWordCount: true
  discuss: false
  social: {}
  search:
    enable: true
    type: fuse
    contentLength: 4000
    placeholder: Search
    maxResultLength: 10
    fuse:
      isCaseSensitive: false
      shouldSort: true
      location: 0
      distance: 100
      threshold: 0.3
      minMatchCharLength: 2
      keys: [title, permalink, summary, content]

menu:
  main:
    - identifier: posts
      name: Posts
      url: /posts/
      weight: 1
    - identifier: tags
      name: Tags
      url: /tags/
      weight: 2
    - identifier: about
      name: About
      url: /about/
      weight: 3

outputs:
  home: [HTML, RSS, JSON]
  page: [HTML]
  section: [HTML, RSS]
"#;

/// Front-matter template for new posts
pub const POST_ARCHETYPE: &str = r#"---
title: {{ title }}
date: {{ date }}
published: false
description: ""
tags: []
showWordCount: true
discuss: false
---
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("config.yaml");
    if config_path.exists() {
        anyhow::bail!("Configuration already exists: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("archetypes"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    fs::write(&config_path, CONFIG)?;
    fs::write(target_dir.join("archetypes/posts.md"), POST_ARCHETYPE)?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
published: true
description: The first post
tags: [meta]
---

Welcome! Posts live under `content/posts/`; run `sitecheck check` before
publishing to catch front-matter mistakes.
"#,
        front_matter_date(&now)
    );
    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    tracing::debug!("Initialized site in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Site;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert!(site.config.missing_required_keys().is_empty());
        assert_eq!(site.config.menu_entries("main").len(), 3);

        let loaded = site.load_content();
        assert_eq!(loaded.posts.len(), 1);
        assert_eq!(loaded.posts[0].title, "Hello World");
    }

    #[test]
    fn test_init_refuses_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
