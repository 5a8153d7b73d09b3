//! List site content

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::json;

use crate::build::BuildFilter;
use crate::helpers::short_date;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str, as_json: bool) -> Result<()> {
    let output = render(site, content_type, as_json, &BuildFilter::now(&site.config))?;
    print!("{}", output);
    Ok(())
}

/// Produce the listing text for `content_type`
pub fn render(
    site: &Site,
    content_type: &str,
    as_json: bool,
    filter: &BuildFilter,
) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let loaded = site.load_content();
            let posts = filter.select(&loaded.posts);
            if as_json {
                out = serde_json::to_string_pretty(&posts)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Posts ({}):\n", posts.len()));
                for post in posts {
                    let date = post.date.as_ref().map(short_date).unwrap_or_default();
                    out.push_str(&format!(
                        "  {} - {} [{}]\n",
                        date,
                        post.display_title(),
                        post.source
                    ));
                }
            }
        }
        "draft" | "drafts" => {
            let loaded = site.load_content();
            let excluded: Vec<_> = loaded
                .posts
                .iter()
                .filter_map(|p| filter.exclusion(p).map(|reason| (p, reason)))
                .collect();
            if as_json {
                let rows: Vec<_> = excluded
                    .iter()
                    .map(|(p, reason)| {
                        json!({
                            "title": p.display_title(),
                            "source": p.source,
                            "reason": reason.to_string(),
                        })
                    })
                    .collect();
                out = serde_json::to_string_pretty(&rows)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Not built ({}):\n", excluded.len()));
                for (post, reason) in excluded {
                    out.push_str(&format!(
                        "  {} [{}] - {}\n",
                        post.display_title(),
                        post.source,
                        reason
                    ));
                }
            }
        }
        "tag" | "tags" => {
            let loaded = site.load_content();
            let mut tags: IndexMap<&str, usize> = IndexMap::new();
            for post in filter.select(&loaded.posts) {
                for tag in &post.tags {
                    *tags.entry(tag.as_str()).or_insert(0) += 1;
                }
            }
            // Most used first, ties by name
            tags.sort_by(|a, ca, b, cb| cb.cmp(ca).then_with(|| a.cmp(b)));
            if as_json {
                out = serde_json::to_string_pretty(&tags)?;
                out.push('\n');
            } else {
                out.push_str(&format!("Tags ({}):\n", tags.len()));
                for (tag, count) in tags {
                    out.push_str(&format!("  {} ({})\n", tag, count));
                }
            }
        }
        "menu" | "menus" => {
            if as_json {
                let menus: IndexMap<&str, Vec<_>> = site
                    .config
                    .menu
                    .keys()
                    .map(|name| (name.as_str(), site.config.menu_entries(name)))
                    .collect();
                out = serde_json::to_string_pretty(&menus)?;
                out.push('\n');
            } else {
                for name in site.config.menu.keys() {
                    let entries = site.config.menu_entries(name);
                    out.push_str(&format!("Menu {} ({}):\n", name, entries.len()));
                    for entry in entries {
                        out.push_str(&format!(
                            "  {:>3}  {} -> {} [{}]\n",
                            entry.weight, entry.name, entry.url, entry.identifier
                        ));
                    }
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, drafts, tags, menu",
                content_type
            );
        }
    }

    Ok(out)
}
