//! Data validation for configuration and content
//!
//! Problems found here are data, not errors: every check runs and the
//! resulting [`Report`] decides whether a build may proceed.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::config::{MenuEntry, SearchConfig, SiteConfig};
use crate::content::{LoadedContent, Post};
use crate::helpers::is_http_url;
use crate::Site;

/// Output formats the generator knows how to produce
pub const KNOWN_OUTPUT_FORMATS: [&str; 8] = [
    "HTML", "RSS", "JSON", "AMP", "Calendar", "CSS", "ROBOTS", "SITEMAP",
];

/// Source label used for configuration diagnostics
pub const CONFIG_SOURCE: &str = "config";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// File (relative to the content directory) or `config`
    pub source: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.source, self.message)
    }
}

/// All findings of a check run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

/// Check the whole site: configuration, load failures and every post
pub fn check_site(site: &Site, loaded: &LoadedContent) -> Report {
    let mut report = Report::default();

    if site.config_path.is_none() {
        report.extend([Diagnostic::error(
            CONFIG_SOURCE,
            format!("no configuration file found in {}", site.base_dir.display()),
        )]);
    }
    report.extend(check_config(&site.config));

    for failure in &loaded.failures {
        report.extend([Diagnostic::error(
            failure.source.clone(),
            failure.error.to_string(),
        )]);
    }

    for post in &loaded.posts {
        report.extend(check_post(post));
    }
    report.extend(check_unique_slugs(&loaded.posts));

    report.diagnostics.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.source.cmp(&b.source))
    });
    report
}

/// Check the site configuration
pub fn check_config(config: &SiteConfig) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = config
        .missing_required_keys()
        .into_iter()
        .map(|key| {
            Diagnostic::error(CONFIG_SOURCE, format!("missing required key `{}`", key))
        })
        .collect();

    diagnostics.extend(check_base_url(&config.base_url));

    if let Err(e) = config.timezone() {
        diagnostics.push(Diagnostic::error(CONFIG_SOURCE, e.to_string()));
    }

    for (name, entries) in &config.menu {
        diagnostics.extend(check_menu(name, entries));
    }
    diagnostics.extend(check_outputs(&config.outputs));
    if let Some(search) = config.search() {
        diagnostics.extend(check_search(search));
    }

    diagnostics
}

fn check_base_url(base_url: &str) -> Vec<Diagnostic> {
    if !is_http_url(base_url) {
        return vec![Diagnostic::error(
            CONFIG_SOURCE,
            format!("baseURL {:?} is not an absolute http(s) URL", base_url),
        )];
    }
    if !base_url.ends_with('/') {
        return vec![Diagnostic::warning(
            CONFIG_SOURCE,
            format!("baseURL {:?} should end with `/`", base_url),
        )];
    }
    Vec::new()
}

/// Check one named menu: identifiers unique and present, weights well-defined
pub fn check_menu(name: &str, entries: &[MenuEntry]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut identifiers = HashSet::new();
    let mut weights: IndexMap<i64, Vec<&str>> = IndexMap::new();

    for (i, entry) in entries.iter().enumerate() {
        let label = if entry.identifier.is_empty() {
            format!("menu.{}[{}]", name, i)
        } else {
            format!("menu.{} entry `{}`", name, entry.identifier)
        };

        // Entries without an identifier are keyed by their name
        let key = if entry.identifier.trim().is_empty() {
            if !entry.name.trim().is_empty() {
                diagnostics.push(Diagnostic::warning(
                    CONFIG_SOURCE,
                    format!("{} has no identifier; name is used", label),
                ));
            }
            entry.name.trim()
        } else {
            entry.identifier.trim()
        };
        if !key.is_empty() && !identifiers.insert(key) {
            diagnostics.push(Diagnostic::error(
                CONFIG_SOURCE,
                format!("menu.{} repeats identifier `{}`", name, key),
            ));
        }

        if entry.name.trim().is_empty() {
            diagnostics.push(Diagnostic::error(
                CONFIG_SOURCE,
                format!("{} has no name", label),
            ));
        }
        if entry.url.trim().is_empty() {
            diagnostics.push(Diagnostic::warning(
                CONFIG_SOURCE,
                format!("{} has no url", label),
            ));
        }
        if entry.weight < 0 {
            diagnostics.push(Diagnostic::warning(
                CONFIG_SOURCE,
                format!("{} has negative weight {}", label, entry.weight),
            ));
        }
        if entry.weight != 0 {
            weights
                .entry(entry.weight)
                .or_default()
                .push(key);
        }
    }

    for (weight, ids) in weights {
        if ids.len() > 1 {
            diagnostics.push(Diagnostic::warning(
                CONFIG_SOURCE,
                format!(
                    "menu.{} entries {} share weight {}; order falls back to name",
                    name,
                    ids.join(", "),
                    weight
                ),
            ));
        }
    }

    diagnostics
}

/// Every configured output format must be one the generator knows
pub fn check_outputs(outputs: &IndexMap<String, Vec<String>>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (kind, formats) in outputs {
        let mut seen = HashSet::new();
        for format in formats {
            if !KNOWN_OUTPUT_FORMATS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(format))
            {
                diagnostics.push(Diagnostic::error(
                    CONFIG_SOURCE,
                    format!("outputs.{}: unknown output format `{}`", kind, format),
                ));
            }
            if !seen.insert(format.to_ascii_uppercase()) {
                diagnostics.push(Diagnostic::warning(
                    CONFIG_SOURCE,
                    format!("outputs.{}: `{}` listed twice", kind, format),
                ));
            }
        }
    }
    diagnostics
}

/// Check the fuzzy-search block
pub fn check_search(search: &SearchConfig) -> Vec<Diagnostic> {
    let fuse = &search.fuse;
    let mut diagnostics = Vec::new();
    let mut error = |message: String| {
        diagnostics.push(Diagnostic::error(
            CONFIG_SOURCE,
            format!("params.search.fuse: {}", message),
        ))
    };

    if !(0.0..=1.0).contains(&fuse.threshold) {
        error(format!("threshold {} is outside 0.0..=1.0", fuse.threshold));
    }
    if fuse.distance < 0 {
        error(format!("distance {} is negative", fuse.distance));
    }
    if fuse.location < 0 {
        error(format!("location {} is negative", fuse.location));
    }
    if fuse.min_match_char_length < 1 {
        error(format!(
            "minMatchCharLength {} must be at least 1",
            fuse.min_match_char_length
        ));
    }
    if search.enable && fuse.keys.is_empty() {
        error("keys is empty, nothing would be indexed".to_string());
    }
    for key in fuse.unknown_keys() {
        error(format!(
            "key `{}` is not indexed (expected title, permalink, summary or content)",
            key
        ));
    }

    diagnostics
}

/// Check one post's front-matter
pub fn check_post(post: &Post) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let source = post.source.as_str();

    match (&post.raw_date, post.date) {
        (Some(raw), None) => diagnostics.push(Diagnostic::error(
            source,
            format!("date {:?} is not a valid calendar date", raw),
        )),
        (None, _) if post.published => diagnostics.push(Diagnostic::error(
            source,
            "published post has no date",
        )),
        _ => {}
    }

    if post.published && post.title.is_empty() {
        diagnostics.push(Diagnostic::error(source, "published post has no title"));
    }

    if let (Some(date), Some(lastmod)) = (post.date, post.lastmod) {
        if lastmod < date {
            diagnostics.push(Diagnostic::warning(
                source,
                "lastmod is earlier than date",
            ));
        }
    }
    if let (Some(raw), None) = (&post.raw_lastmod, post.lastmod) {
        diagnostics.push(Diagnostic::error(
            source,
            format!("lastmod {:?} is not a valid date", raw),
        ));
    }

    for tag in &post.duplicate_tags {
        diagnostics.push(Diagnostic::warning(
            source,
            format!("tag `{}` is listed more than once", tag),
        ));
    }

    diagnostics
}

/// Two posts may not share a slug; they would publish to the same URL
pub fn check_unique_slugs(posts: &[Post]) -> Vec<Diagnostic> {
    let mut by_slug: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for post in posts {
        by_slug
            .entry(post.slug.as_str())
            .or_default()
            .push(post.source.as_str());
    }

    by_slug
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(slug, sources)| {
            Diagnostic::error(
                sources[0],
                format!("slug `{}` is also used by {}", slug, sources[1..].join(", ")),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use std::path::Path;

    const CONFIG: &str = r#"
baseURL: https://blog.example.com/
title: Notes
params:
  search:
    enable: true
menu:
  main:
    - {identifier: posts, name: Posts, url: /posts/, weight: 1}
    - {identifier: tags, name: Tags, url: /tags/, weight: 2}
outputs:
  home: [HTML, RSS, JSON]
"#;

    fn config(yaml: &str) -> SiteConfig {
        SiteConfig::from_yaml(yaml).unwrap()
    }

    fn post(source: &str, text: &str) -> Post {
        Post::parse(
            text,
            source,
            Path::new(source),
            &config(CONFIG),
            &Tz::UTC,
        )
        .unwrap()
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_valid_config_is_clean() {
        assert!(check_config(&config(CONFIG)).is_empty());
    }

    #[test]
    fn test_missing_required_keys() {
        let diagnostics = check_config(&config("title: x\nbaseURL: https://a.example/\n"));
        assert_eq!(
            messages(&diagnostics),
            vec!["missing required key `params`", "missing required key `menu`"]
        );
        assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(check_base_url("https://a.example")[0].severity, Severity::Warning);
        assert_eq!(check_base_url("/relative/")[0].severity, Severity::Error);
        assert!(check_base_url("http://a.example/").is_empty());
    }

    #[test]
    fn test_duplicate_menu_identifiers() {
        let entries: Vec<MenuEntry> = serde_yaml::from_str(
            "- {identifier: posts, name: Posts, url: /posts/, weight: 1}\n\
             - {identifier: posts, name: Again, url: /again/, weight: 2}\n",
        )
        .unwrap();
        let diagnostics = check_menu("main", &entries);
        assert_eq!(messages(&diagnostics), vec!["menu.main repeats identifier `posts`"]);
    }

    #[test]
    fn test_menu_weight_and_field_checks() {
        let entries: Vec<MenuEntry> = serde_yaml::from_str(
            "- {identifier: a, name: A, url: /a/, weight: 3}\n\
             - {identifier: b, name: B, url: /b/, weight: 3}\n\
             - {name: Nameless id, url: /c/, weight: -1}\n\
             - {identifier: d, url: /d/}\n",
        )
        .unwrap();
        let diagnostics = check_menu("main", &entries);
        let errors: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(errors, vec!["menu.main entry `d` has no name"]);
        let warnings: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            warnings,
            vec![
                "menu.main[2] has no identifier; name is used",
                "menu.main[2] has negative weight -1",
                "menu.main entries a, b share weight 3; order falls back to name",
            ]
        );
    }

    #[test]
    fn test_menu_name_stands_in_for_identifier() {
        let entries: Vec<MenuEntry> = serde_yaml::from_str(
            "- {name: About, url: /about/, weight: 1}\n\
             - {name: About, url: /about-me/, weight: 2}\n\
             - {identifier: About, name: Other, url: /other/, weight: 3}\n\
             - {identifier: posts, name: Posts, url: /posts/, weight: 4}\n",
        )
        .unwrap();
        let errors: Vec<_> = check_menu("main", &entries)
            .into_iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message)
            .collect();
        assert_eq!(
            errors,
            vec![
                "menu.main repeats identifier `About`",
                "menu.main repeats identifier `About`",
            ]
        );
    }

    #[test]
    fn test_unknown_output_format() {
        let config = config("outputs:\n  home: [HTML, ATOM, rss, RSS]\n");
        let diagnostics = check_outputs(&config.outputs);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "outputs.home: unknown output format `ATOM`",
                "outputs.home: `RSS` listed twice",
            ]
        );
    }

    #[test]
    fn test_search_bounds() {
        let search: SearchConfig = serde_yaml::from_str(
            "fuse:\n  threshold: 1.5\n  distance: -1\n  minMatchCharLength: 0\n  keys: [title, tags]\n",
        )
        .unwrap();
        let diagnostics = check_search(&search);
        assert_eq!(diagnostics.len(), 4);
        assert!(diagnostics[0].message.contains("threshold 1.5"));
        assert!(diagnostics[3].message.contains("`tags`"));
    }

    #[test]
    fn test_search_needs_keys_when_enabled() {
        let search: SearchConfig = serde_yaml::from_str("enable: true\nfuse:\n  keys: []\n").unwrap();
        assert_eq!(check_search(&search).len(), 1);
        let search: SearchConfig = serde_yaml::from_str("enable: false\nfuse:\n  keys: []\n").unwrap();
        assert!(check_search(&search).is_empty());
    }

    #[test]
    fn test_post_date_must_parse() {
        let p = post("posts/a.md", "---\ntitle: A\ndate: 2021-02-29\n---\n");
        assert_eq!(
            messages(&check_post(&p)),
            vec!["date \"2021-02-29\" is not a valid calendar date"]
        );
    }

    #[test]
    fn test_published_post_needs_title_and_date() {
        let p = post("posts/a.md", "---\npublished: true\n---\n");
        assert_eq!(
            messages(&check_post(&p)),
            vec!["published post has no date", "published post has no title"]
        );

        let p = post("posts/a.md", "---\npublished: false\n---\n");
        assert!(check_post(&p).is_empty());
    }

    #[test]
    fn test_unpublished_post_with_bad_date_still_fails() {
        let p = post("posts/a.md", "---\npublished: false\ndate: someday\n---\n");
        assert_eq!(check_post(&p).len(), 1);
    }

    #[test]
    fn test_duplicate_tags_warn() {
        let p = post("posts/a.md", "---\ntitle: A\ndate: 2020-01-01\ntags: [x, x]\n---\n");
        let diagnostics = check_post(&p);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn test_lastmod_checks() {
        let p = post(
            "posts/a.md",
            "---\ntitle: A\ndate: 2020-01-02\nlastmod: 2020-01-01\n---\n",
        );
        assert_eq!(messages(&check_post(&p)), vec!["lastmod is earlier than date"]);

        let p = post(
            "posts/a.md",
            "---\ntitle: A\ndate: 2020-01-02\nlastmod: later\n---\n",
        );
        assert_eq!(
            messages(&check_post(&p)),
            vec!["lastmod \"later\" is not a valid date"]
        );
    }

    #[test]
    fn test_duplicate_slugs() {
        let posts = vec![
            post("posts/a.md", "---\ntitle: A\nslug: same\n---\n"),
            post("posts/b.md", "---\ntitle: B\nslug: same\n---\n"),
            post("posts/c.md", "---\ntitle: C\n---\n"),
        ];
        let diagnostics = check_unique_slugs(&posts);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].source, "posts/a.md");
        assert_eq!(diagnostics[0].message, "slug `same` is also used by posts/b.md");
    }

    #[test]
    fn test_report_has_errors() {
        let mut report = Report::default();
        assert!(!report.has_errors());
        report.extend([Diagnostic::warning("config", "w")]);
        assert!(!report.has_errors());
        report.extend([Diagnostic::error("config", "e")]);
        assert!(report.has_errors());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.diagnostics[1].to_string(), "error: config: e");
    }
}
