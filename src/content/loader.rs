//! Content loader - loads posts from the content directory

use chrono_tz::Tz;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::POSTS_SECTION;
use super::Post;
use crate::error::{Error, Result};
use crate::Site;

/// A file that could not be turned into a post
#[derive(Debug)]
pub struct LoadFailure {
    /// Source path relative to the content directory
    pub source: String,
    pub error: Error,
}

/// Everything found under the posts section
#[derive(Debug, Default)]
pub struct LoadedContent {
    /// Newest first; posts without a usable date sort last
    pub posts: Vec<Post>,
    pub failures: Vec<LoadFailure>,
}

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    tz: Tz,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader.
    ///
    /// An unknown `timeZone` falls back to UTC here; validation reports it.
    pub fn new(site: &'a Site) -> Self {
        let tz = site.config.timezone().unwrap_or_else(|e| {
            tracing::warn!("{}, reading dates as UTC", e);
            Tz::UTC
        });
        Self { site, tz }
    }

    /// Directory holding the posts section
    pub fn posts_dir(&self) -> PathBuf {
        self.site.content_dir.join(POSTS_SECTION)
    }

    /// Load all posts, collecting per-file failures instead of aborting
    pub fn load_posts(&self) -> LoadedContent {
        let posts_dir = self.posts_dir();
        let mut loaded = LoadedContent::default();
        if !posts_dir.exists() {
            tracing::debug!("No posts directory at {:?}", posts_dir);
            return loaded;
        }

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    tracing::warn!("Failed to walk {:?}: {}", path, e);
                    loaded.failures.push(LoadFailure {
                        source: self.relative(&path),
                        error: Error::io(path, e.into()),
                    });
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(post) => {
                    tracing::debug!("Loaded {}", post.source);
                    loaded.posts.push(post);
                }
                Err(error) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, error);
                    loaded.failures.push(LoadFailure {
                        source: self.relative(path),
                        error,
                    });
                }
            }
        }

        // Newest first; undated posts go last
        loaded.posts.sort_by(|a, b| b.date.cmp(&a.date));

        loaded
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Post::parse(
            &content,
            &self.relative(path),
            path,
            &self.site.config,
            &self.tz,
        )
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.site.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config.yaml", "baseURL: https://b.example/\n");
        write(
            dir.path(),
            "content/posts/old.md",
            "---\ntitle: Old\ndate: 2018-01-01\n---\n",
        );
        write(
            dir.path(),
            "content/posts/new.md",
            "---\ntitle: New\ndate: 2022-01-01\n---\n",
        );
        write(
            dir.path(),
            "content/posts/undated.md",
            "---\ntitle: Undated\n---\n",
        );
        write(dir.path(), "content/posts/notes.txt", "ignored");

        let site = Site::new(dir.path()).unwrap();
        let loaded = ContentLoader::new(&site).load_posts();
        let titles: Vec<_> = loaded.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
        assert!(loaded.failures.is_empty());
        assert_eq!(
            loaded.posts[0].source,
            Path::new("posts").join("new.md").to_string_lossy()
        );
    }

    #[test]
    fn test_malformed_front_matter_is_collected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "content/posts/broken.md",
            "---\ntitle: [oops\ndate: 2020-01-01\n---\n",
        );
        write(dir.path(), "content/posts/fine.md", "---\ntitle: Fine\n---\n");

        let site = Site::new(dir.path()).unwrap();
        let loaded = ContentLoader::new(&site).load_posts();
        assert_eq!(loaded.posts.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert!(loaded.failures[0].source.ends_with("broken.md"));
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let loaded = ContentLoader::new(&site).load_posts();
        assert!(loaded.posts.is_empty());
        assert!(loaded.failures.is_empty());
    }

    #[test]
    fn test_is_markdown_file() {
        assert!(is_markdown_file(Path::new("a.md")));
        assert!(is_markdown_file(Path::new("a.markdown")));
        assert!(!is_markdown_file(Path::new("a.png")));
    }

    #[test]
    fn test_unknown_timezone_reads_dates_as_utc() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "config.yaml", "timeZone: Mars/Olympus\n");
        write(
            dir.path(),
            "content/posts/a.md",
            "---\ntitle: A\ndate: 2020-01-01 08:00\n---\n",
        );

        let site = Site::new(dir.path()).unwrap();
        let loaded = ContentLoader::new(&site).load_posts();
        let date = loaded.posts[0].date.unwrap();
        assert_eq!(date.offset().local_minus_utc(), 0);
    }
}
