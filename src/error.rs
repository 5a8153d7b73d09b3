//! Library error type

use std::path::PathBuf;

/// Errors raised while loading configuration or content
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed YAML in {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("malformed TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("malformed JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid front-matter: {0}")]
    FrontMatter(String),

    #[error("unknown time zone {0:?}")]
    Timezone(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
