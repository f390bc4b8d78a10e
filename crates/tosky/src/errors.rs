//! Error types for the tosky site.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Rust uses the Debug trait to show errors when they're returned from main,
                    // but thiserror renders through Display. This redirects Debug to Display.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

/// Configuration problems are fatal at startup, before the server binds.
#[derive(Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {path}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("`origin` must be set to an absolute http(s) URL, got {0:?}")]
    InvalidOrigin(String),
    #[error("`content_dirs` entry {0:?} must be a bare directory name")]
    InvalidContentDir(String),
    #[error("`posts.fetch_timeout_secs` must be greater than zero")]
    ZeroFetchTimeout,
}

/// Failures talking to the post source. These degrade the sitemap rather
/// than failing the request.
#[derive(Error)]
pub enum ContentError {
    #[error("Post source request failed")]
    Request(#[from] reqwest::Error),
    #[error("Post source returned HTTP {0}")]
    Status(u16),
    #[error("Post source did not respond within {0}s")]
    Timeout(u64),
}

impl_debug_for_error!(ConfigError, ContentError);
