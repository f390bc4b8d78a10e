//! Sitemap assembly and XML serialization.
//!
//! The document is rebuilt from scratch on every request: statically
//! discovered routes from each configured content section, plus one
//! `/blog/{slug}` entry per published post, deduplicated and sorted so two
//! generations over identical inputs are byte-identical.
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::config::SiteConfig;
use crate::content::{self, PostSource};
use crate::routing::discover_routes;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// An ordered, duplicate-free set of site-relative routes ready to
/// serialize.
pub struct Sitemap {
    routes: Vec<String>,
}

impl Sitemap {
    /// Collapses duplicates and fixes the order. Every route is expected to
    /// start with `/`; discovery and post mapping both guarantee it.
    pub fn from_routes(routes: impl IntoIterator<Item = String>) -> Self {
        let mut seen = FxHashSet::default();
        let mut routes: Vec<String> = routes
            .into_iter()
            .filter(|route| seen.insert(route.clone()))
            .collect();
        routes.sort_unstable();

        Self { routes }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Serializes to the urlset document. An empty route set still yields a
    /// well-formed empty `<urlset>`.
    pub fn into_xml(self, origin: &str) -> String {
        let mut xml = String::with_capacity(256 + self.routes.len() * 64);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for route in &self.routes {
            xml.push_str("<url><loc>");
            xml.push_str(&escape_xml(&format!("{}{}", origin, route)));
            xml.push_str("</loc></url>\n");
        }

        xml.push_str("</urlset>");
        xml
    }
}

/// Escapes XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Builds the full sitemap document for one request.
///
/// Static discovery failures are contained per branch inside
/// [`discover_routes`]; a failing or stalled post source degrades the
/// document to static routes only instead of failing the request.
pub async fn generate(config: &SiteConfig, source: Option<&dyn PostSource>) -> String {
    let mut routes = Vec::new();

    for dir in &config.content_dirs {
        routes.extend(discover_routes(&config.content_root, dir));
    }

    match source {
        Some(source) => {
            match content::list_posts_with_timeout(source, config.posts.fetch_timeout_secs).await {
                Ok(posts) => routes.extend(posts.iter().map(|post| post.route_path())),
                Err(err) => {
                    warn!(name: "sitemap", "Post source unavailable, serving static routes only: {}", err);
                }
            }
        }
        None => debug!(name: "sitemap", "No post source configured"),
    }

    let sitemap = Sitemap::from_routes(routes);
    info!(name: "sitemap", "Generated sitemap with {} URLs", sitemap.len());

    sitemap.into_xml(&config.origin)
}
