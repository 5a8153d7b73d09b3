//! Post model

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::markdown;
use super::FrontMatter;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::helpers::{encode_segment, full_url_for};

/// Section posts are published under
pub const POSTS_SECTION: &str = "posts";

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title as declared, empty when missing
    pub title: String,

    /// Publication date, when it parses
    pub date: Option<DateTime<FixedOffset>>,

    /// The date exactly as written in front-matter
    pub raw_date: Option<String>,

    /// Last modification date
    pub lastmod: Option<DateTime<FixedOffset>>,

    pub raw_lastmod: Option<String>,

    /// Whether the post is published
    pub published: bool,

    /// Whether the post is a draft
    pub draft: bool,

    pub description: Option<String>,

    /// Post tags, first occurrence wins
    pub tags: IndexSet<String>,

    /// Tags listed more than once in front-matter
    #[serde(skip)]
    pub duplicate_tags: Vec<String>,

    pub categories: Vec<String>,

    /// Raw markdown body
    pub body: String,

    /// Markdown before the summary divider
    pub summary: Option<String>,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// Full permalink URL
    pub permalink: String,

    pub word_count: usize,

    /// Per-post override of the theme's word-count display
    pub show_word_count: Option<bool>,

    /// Per-post override of the theme's comment section
    pub discuss: Option<bool>,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Post {
    /// Build a post from a file's text
    pub fn parse(
        text: &str,
        source: &str,
        full_source: &Path,
        config: &SiteConfig,
        tz: &Tz,
    ) -> Result<Self> {
        let (fm, body) = FrontMatter::parse(text)?;

        let date = fm.parse_date(tz);
        let lastmod = fm.parse_lastmod(tz);

        let mut tags = IndexSet::new();
        let mut duplicate_tags = Vec::new();
        for tag in fm.tags {
            let tag = tag.trim().to_string();
            if tag.is_empty() {
                continue;
            }
            if !tags.insert(tag.clone()) && !duplicate_tags.contains(&tag) {
                duplicate_tags.push(tag);
            }
        }

        let stem = full_source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        // `index.md` in a page bundle takes its directory name
        let stem = if stem == "index" {
            full_source
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .unwrap_or(stem)
        } else {
            stem
        };
        let slug = match fm.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slug::slugify(stem),
        };
        let permalink = full_url_for(
            config,
            &format!("{}/{}/", POSTS_SECTION, encode_segment(&slug)),
        );

        let (summary, _) = markdown::split_summary(body);

        Ok(Self {
            title: fm.title.unwrap_or_default().trim().to_string(),
            date,
            raw_date: fm.date,
            lastmod,
            raw_lastmod: fm.lastmod,
            published: fm.published,
            draft: fm.draft,
            description: fm.description,
            tags,
            duplicate_tags,
            categories: fm.categories,
            body: body.to_string(),
            summary: summary.map(str::to_string),
            source: source.to_string(),
            full_source: full_source.to_path_buf(),
            slug,
            permalink,
            word_count: markdown::word_count(body),
            show_word_count: fm.show_word_count,
            discuss: fm.discuss,
            extra: fm.extra,
        })
    }

    /// Title for listings, falling back to the slug
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.slug
        } else {
            &self.title
        }
    }

    /// Whether the word count should be shown, given the site default
    pub fn shows_word_count(&self, config: &SiteConfig) -> bool {
        self.show_word_count
            .or_else(|| config.params.toggle("showWordCount"))
            .unwrap_or(false)
    }

    /// Whether the comment section should be shown, given the site default
    pub fn discussion_enabled(&self, config: &SiteConfig) -> bool {
        self.discuss
            .or_else(|| config.params.toggle("discuss"))
            .unwrap_or(false)
    }

    pub fn reading_time(&self) -> usize {
        markdown::reading_time(self.word_count)
    }
}
