//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use super::init::POST_ARCHETYPE;
use crate::content::POSTS_SECTION;
use crate::helpers::front_matter_date;
use crate::Site;

/// Create a new (unpublished) post and return its path
pub fn create_post(site: &Site, title: &str, name: Option<&str>) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        anyhow::bail!("A post needs a title");
    }

    let target_dir = site.content_dir.join(POSTS_SECTION);
    fs::create_dir_all(&target_dir)?;

    let file_stem = match name {
        Some(n) => n.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if file_stem.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}", title);
    }
    let file_path = target_dir.join(format!("{}.md", file_stem));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Site archetypes win over the built-in template
    let archetype = ["posts.md", "default.md"]
        .iter()
        .map(|name| site.base_dir.join("archetypes").join(name))
        .find(|path| path.exists());
    let template = match archetype {
        Some(path) => fs::read_to_string(&path)?,
        None => POST_ARCHETYPE.to_string(),
    };

    let now = chrono::Local::now();
    // The title is emitted as a YAML scalar, replacing any quotes the
    // archetype put around the placeholder
    let title_scalar = serde_yaml::to_string(title)?;
    let title_scalar = title_scalar.trim_end();
    let content = template
        .replace("\"{{ title }}\"", title_scalar)
        .replace("'{{ title }}'", title_scalar)
        .replace("{{ title }}", title_scalar)
        .replace("{{ date }}", &front_matter_date(&now));

    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}
