//! Static route discovery over the content tree.
//!
//! A directory under the content root is route-bearing when it contains a
//! page file (`page.md` or `page.html`). Discovery walks each configured
//! top-level section depth-first and emits one URL path per page file
//! found, so `content/about/page.md` becomes `/about` and
//! `content/static/faq/page.html` becomes `/static/faq`.
use std::path::{Component, Path, PathBuf};

use tracing::warn;

/// Filenames that mark a directory as a servable route.
pub const PAGE_FILE_NAMES: [&str; 2] = ["page.md", "page.html"];

/// Substituted for bracketed dynamic segments (`[slug]`) in emitted paths,
/// so dynamic routes appear once, generically, instead of with literal
/// brackets.
pub const DYNAMIC_PLACEHOLDER: &str = "example";

pub fn is_page_file(name: &str) -> bool {
    PAGE_FILE_NAMES.contains(&name)
}

fn is_dynamic_segment(segment: &str) -> bool {
    segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']')
}

/// Joins accumulated directory segments into a URL path. Segments are
/// joined with forward slashes regardless of the platform's separator, and
/// dynamic segments are replaced with [`DYNAMIC_PLACEHOLDER`].
fn route_path(segments: &[String]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        if is_dynamic_segment(segment) {
            path.push_str(DYNAMIC_PLACEHOLDER);
        } else {
            path.push_str(segment);
        }
    }
    path
}

/// Discovers every statically served URL path under `content_root/dir`.
///
/// A missing section directory yields no routes, and an unreadable
/// subdirectory drops only its own branch; neither aborts discovery. The
/// result is not deduplicated, callers dedupe after merging sections.
pub fn discover_routes(content_root: &Path, dir: &str) -> Vec<String> {
    let mut routes = Vec::new();
    let root = content_root.join(dir);
    if root.is_dir() {
        walk(&root, &mut vec![dir.to_string()], &mut routes);
    }
    routes
}

fn walk(dir_path: &Path, segments: &mut Vec<String>, routes: &mut Vec<String>) {
    let entries = match std::fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(name: "routes", "Skipping unreadable directory {}: {}", dir_path.display(), err);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(name: "routes", "Skipping unreadable entry in {}: {}", dir_path.display(), err);
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        let entry_path = entry.path();

        if entry_path.is_dir() {
            segments.push(name);
            walk(&entry_path, segments, routes);
            segments.pop();
        } else if is_page_file(&name) {
            routes.push(route_path(segments));
        }
    }
}

/// A page file resolved for a request.
#[derive(Debug, PartialEq)]
pub struct PageFile {
    pub path: PathBuf,
    pub kind: PageKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageKind {
    Markdown,
    Html,
}

/// Resolves the page file backing a literal URL path, if any.
///
/// Traversal components (`..`, absolute prefixes) and literal dynamic
/// segments are rejected outright; those never name a servable page.
pub fn resolve_page(content_root: &Path, url_path: &str) -> Option<PageFile> {
    let mut dir = content_root.to_path_buf();

    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return None,
        }
        if segment.starts_with(['.', '[']) {
            return None;
        }
        dir.push(segment);
    }

    let markdown = dir.join(PAGE_FILE_NAMES[0]);
    if markdown.is_file() {
        return Some(PageFile {
            path: markdown,
            kind: PageKind::Markdown,
        });
    }

    let html = dir.join(PAGE_FILE_NAMES[1]);
    if html.is_file() {
        return Some(PageFile {
            path: html,
            kind: PageKind::Html,
        });
    }

    None
}
