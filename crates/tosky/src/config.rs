//! Site configuration, loaded from `site.toml`.
//!
//! The configuration is deserialized once at startup and validated with
//! [`SiteConfig::validate`] before the server ever binds. A bad config is a
//! startup failure, never a request-time one.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConfigError;

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}

fn default_content_dirs() -> Vec<String> {
    ["about", "blog", "okx", "static"]
        .map(String::from)
        .to_vec()
}

fn default_fetch_timeout() -> u64 {
    5
}

fn default_port() -> u16 {
    1864
}

/// Site-wide configuration.
///
/// ## Example
/// ```toml
/// origin = "https://tosky.top"
/// title = "Tosky"
///
/// [posts]
/// api_url = "https://cms.example.com/api/posts"
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Absolute base URL for the site, e.g. `https://tosky.top`. Used to
    /// build `<loc>` values in the sitemap and canonical URLs in page meta
    /// tags. Trailing slashes are trimmed during validation.
    pub origin: String,

    /// Site name, used in the layout header and `<title>` suffix.
    #[serde(default = "SiteConfig::default_title")]
    pub title: String,

    /// Default meta description for pages that don't provide one.
    #[serde(default)]
    pub description: String,

    /// Base directory of the page-bearing content tree.
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,

    /// Top-level sections of the content tree scanned for sitemap routes.
    /// Sections that don't exist on disk simply contribute no routes.
    #[serde(default = "default_content_dirs")]
    pub content_dirs: Vec<String>,

    /// Directory of static assets served as-is, if it exists.
    #[serde(default)]
    pub static_assets_dir: Option<PathBuf>,

    #[serde(default)]
    pub posts: PostsOptions,

    #[serde(default)]
    pub server: ServerOptions,
}

/// Options for the remote post source.
#[derive(Debug, Deserialize, Clone)]
pub struct PostsOptions {
    /// Endpoint returning the published posts as JSON. When unset, the
    /// sitemap contains statically discovered routes only.
    pub api_url: Option<String>,

    /// How long a list-posts call may take before the sitemap degrades to
    /// static routes.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for PostsOptions {
    fn default() -> Self {
        Self {
            api_url: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerOptions {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl SiteConfig {
    fn default_title() -> String {
        "Tosky".to_string()
    }

    /// Reads and validates the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: SiteConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks invariants the rest of the crate relies on. Called by
    /// [`SiteConfig::load`]; exposed separately for configs built in code.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.origin.trim_end_matches('/');
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ConfigError::InvalidOrigin(self.origin.clone()));
        }
        self.origin = trimmed.to_string();

        for dir in &self.content_dirs {
            if dir.is_empty() || dir.contains(['/', '\\']) || dir == ".." {
                return Err(ConfigError::InvalidContentDir(dir.clone()));
            }
        }

        if self.posts.fetch_timeout_secs == 0 {
            return Err(ConfigError::ZeroFetchTimeout);
        }

        Ok(())
    }

    /// Absolute URL of the sitemap endpoint, used by robots.txt.
    pub fn sitemap_url(&self) -> String {
        format!("{}/api/sitemap", self.origin)
    }
}
