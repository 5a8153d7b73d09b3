//! Production build inclusion rules
//!
//! Mirrors what the external generator publishes: a post is built when it
//! is published, not a draft, and dated no later than the build time.

use chrono::{DateTime, FixedOffset, Utc};
use std::fmt;

use crate::config::SiteConfig;
use crate::content::Post;

/// Why a post is left out of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Unpublished,
    Draft,
    InvalidDate,
    Future,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Exclusion::Unpublished => "unpublished",
            Exclusion::Draft => "draft",
            Exclusion::InvalidDate => "missing or invalid date",
            Exclusion::Future => "dated in the future",
        };
        f.write_str(reason)
    }
}

/// Decides which posts a build includes
#[derive(Debug, Clone)]
pub struct BuildFilter {
    pub now: DateTime<FixedOffset>,
    pub build_future: bool,
    pub build_drafts: bool,
}

impl BuildFilter {
    /// Production rules, evaluated at `now`
    pub fn production(now: DateTime<FixedOffset>) -> Self {
        Self {
            now,
            build_future: false,
            build_drafts: false,
        }
    }

    /// Rules relaxed by the site's `buildFuture` / `buildDrafts` flags
    pub fn from_config(config: &SiteConfig, now: DateTime<FixedOffset>) -> Self {
        Self {
            now,
            build_future: config.build_future,
            build_drafts: config.build_drafts,
        }
    }

    /// Rules from the site config (`buildFuture`/`buildDrafts`) evaluated
    /// at the current time
    pub fn now(config: &SiteConfig) -> Self {
        Self::from_config(config, Utc::now().fixed_offset())
    }

    /// The first rule excluding `post`, if any
    pub fn exclusion(&self, post: &Post) -> Option<Exclusion> {
        if !post.published {
            return Some(Exclusion::Unpublished);
        }
        if post.draft && !self.build_drafts {
            return Some(Exclusion::Draft);
        }
        match post.date {
            None => Some(Exclusion::InvalidDate),
            Some(date) if date > self.now && !self.build_future => Some(Exclusion::Future),
            Some(_) => None,
        }
    }

    pub fn includes(&self, post: &Post) -> bool {
        self.exclusion(post).is_none()
    }

    /// Posts included in the build, in their original order
    pub fn select<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        posts.iter().filter(|p| self.includes(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Tz;
    use std::path::Path;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00+00:00").unwrap()
    }

    fn post(front_matter: &str) -> Post {
        let text = format!("---\ntitle: t\n{}\n---\nbody", front_matter);
        Post::parse(
            &text,
            "posts/t.md",
            Path::new("posts/t.md"),
            &SiteConfig::default(),
            &Tz::UTC,
        )
        .unwrap()
    }

    #[test]
    fn test_includes_past_published_post() {
        let filter = BuildFilter::production(now());
        assert_eq!(filter.exclusion(&post("date: 2024-05-31")), None);
        assert_eq!(filter.exclusion(&post("date: 2024-06-01T12:00:00Z")), None);
    }

    #[test]
    fn test_excludes_future_post() {
        let filter = BuildFilter::production(now());
        assert_eq!(
            filter.exclusion(&post("date: 2024-06-01T12:00:01Z")),
            Some(Exclusion::Future)
        );
    }

    #[test]
    fn test_future_offset_is_compared_in_utc() {
        // 20:00 at +08:00 is 12:00 UTC
        let filter = BuildFilter::production(now());
        assert!(filter.includes(&post("date: 2024-06-01T20:00:00+08:00")));
    }

    #[test]
    fn test_excludes_unpublished_and_drafts() {
        let filter = BuildFilter::production(now());
        assert_eq!(
            filter.exclusion(&post("date: 2020-01-01\npublished: false")),
            Some(Exclusion::Unpublished)
        );
        assert_eq!(
            filter.exclusion(&post("date: 2020-01-01\ndraft: true")),
            Some(Exclusion::Draft)
        );
    }

    #[test]
    fn test_excludes_invalid_dates() {
        let filter = BuildFilter::production(now());
        assert_eq!(filter.exclusion(&post("date: 2020-02-31")), Some(Exclusion::InvalidDate));
        assert_eq!(filter.exclusion(&post("description: d")), Some(Exclusion::InvalidDate));
    }

    #[test]
    fn test_config_flags_relax_rules() {
        let config = SiteConfig {
            build_future: true,
            build_drafts: true,
            ..Default::default()
        };
        let filter = BuildFilter::from_config(&config, now());
        assert!(filter.includes(&post("date: 2030-01-01")));
        assert!(filter.includes(&post("date: 2020-01-01\ndraft: true")));
        assert!(!filter.includes(&post("date: 2020-01-01\npublished: false")));
    }

    #[test]
    fn test_select_keeps_order() {
        let posts = vec![
            post("date: 2024-01-02"),
            post("date: 2099-01-01"),
            post("date: 2023-01-01"),
        ];
        let filter = BuildFilter::production(now());
        let selected = filter.select(&posts);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].raw_date.as_deref(), Some("2024-01-02"));
        assert_eq!(selected[1].raw_date.as_deref(), Some("2023-01-01"));
    }
}
