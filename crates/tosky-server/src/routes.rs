pub mod pages;
pub mod robots;
pub mod sitemap;

use std::sync::Arc;

use tosky::{content::PostSource, SiteConfig};

/// Shared, immutable per-process state. Requests never mutate it; the
/// sitemap and pages are rebuilt from the filesystem and post source on
/// every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub posts: Option<Arc<dyn PostSource>>,
}
