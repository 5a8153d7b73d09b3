//! Content module - posts, front-matter and content loading

mod frontmatter;
pub mod loader;
pub mod markdown;
mod post;

pub use frontmatter::{Format, FrontMatter};
pub use loader::{ContentLoader, LoadFailure, LoadedContent};
pub use post::{Post, POSTS_SECTION};
