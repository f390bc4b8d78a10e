use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use maud::html;
use tracing::warn;

use tosky::content;
use tosky::markdown::{extract_title, render_markdown};
use tosky::routing::{resolve_page, PageKind};

use crate::layout::{self, SeoMeta};
use crate::routes::AppState;

/// `GET /`. The home page lives at `content/index.md`, outside the scanned
/// sections, so it never shows up in the sitemap.
pub async fn serve_home(State(state): State<AppState>) -> Response {
    let path = state.config.content_root.join("index.md");
    match tokio::fs::read_to_string(&path).await {
        Ok(source) => markdown_response(&state, &source, "/"),
        Err(err) => {
            warn!(name: "pages", "Failed to read home page {}: {}", path.display(), err);
            not_found(&state)
        }
    }
}

/// Fallback handler: serves any page file found at the request path in the
/// content tree.
pub async fn serve_page(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(page) = resolve_page(&state.config.content_root, uri.path()) else {
        return not_found(&state);
    };

    let source = match tokio::fs::read_to_string(&page.path).await {
        Ok(source) => source,
        Err(err) => {
            warn!(name: "pages", "Failed to read {}: {}", page.path.display(), err);
            return error_page(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "This page could not be rendered.",
            );
        }
    };

    match page.kind {
        PageKind::Markdown => markdown_response(&state, &source, uri.path()),
        PageKind::Html => {
            let seo = SeoMeta::for_page(&state.config, None, uri.path());
            Html(layout::content_page(source, &seo, &state.config).into_string()).into_response()
        }
    }
}

/// `GET /blog/{slug}`. Posts come from the content source's listing; the
/// body is rendered as markdown when the source provides one.
pub async fn serve_blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(source) = state.posts.as_deref() else {
        return not_found(&state);
    };

    let posts =
        match content::list_posts_with_timeout(source, state.config.posts.fetch_timeout_secs).await
        {
            Ok(posts) => posts,
            Err(err) => {
                warn!(name: "blog", "Post source unavailable: {}", err);
                return error_page(
                    &state,
                    StatusCode::BAD_GATEWAY,
                    "Blog unavailable",
                    "The blog is temporarily unavailable, please try again later.",
                );
            }
        };

    let Some(post) = posts.into_iter().find(|post| post.slug == slug) else {
        return not_found(&state);
    };

    let body = match (&post.body, &post.title) {
        (Some(body), _) => body.clone(),
        (None, Some(title)) => format!("# {}\n", title),
        (None, None) => format!("# {}\n", post.slug),
    };

    markdown_response(&state, &body, &post.route_path())
}

fn markdown_response(state: &AppState, source: &str, url_path: &str) -> Response {
    let seo = SeoMeta::for_page(&state.config, extract_title(source), url_path);
    let body = render_markdown(source);
    Html(layout::content_page(body, &seo, &state.config).into_string()).into_response()
}

pub fn not_found(state: &AppState) -> Response {
    error_page(
        state,
        StatusCode::NOT_FOUND,
        "Page not found",
        "Sorry, this page does not exist.",
    )
}

fn error_page(state: &AppState, status: StatusCode, title: &str, message: &str) -> Response {
    let seo = SeoMeta {
        title: title.to_string(),
        description: None,
        canonical_url: None,
    };

    let markup = layout::layout(
        html! {
            section {
                h1 { (title) }
                p { (message) }
            }
        },
        &seo,
        &state.config,
    );

    (status, Html(markup.into_string())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use std::fs;
    use std::path::Path as FsPath;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tosky::content::{PostSource, PostSummary};
    use tosky::{ContentError, SiteConfig};

    struct OnePost;

    #[async_trait]
    impl PostSource for OnePost {
        async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
            Ok(vec![PostSummary {
                slug: "hello-world".to_string(),
                title: Some("Hello World".to_string()),
                updated_at: None,
                body: Some("# Hello World\n\nFirst post.".to_string()),
            }])
        }
    }

    struct DownSource;

    #[async_trait]
    impl PostSource for DownSource {
        async fn list_posts(&self) -> Result<Vec<PostSummary>, ContentError> {
            Err(ContentError::Status(500))
        }
    }

    fn state(content_root: &FsPath, posts: Option<Arc<dyn PostSource>>) -> AppState {
        let mut config: SiteConfig = toml::from_str("origin = \"https://tosky.top\"").unwrap();
        config.content_root = content_root.to_path_buf();
        config.validate().unwrap();

        AppState {
            config: Arc::new(config),
            posts,
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serve_home() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("index.md"), "# Welcome\n\nhi").unwrap();

        let response = serve_home(State(state(root.path(), None))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("<h1>Welcome</h1>"));
    }

    #[tokio::test]
    async fn test_serve_home_missing_is_404() {
        let root = tempdir().unwrap();
        let response = serve_home(State(state(root.path(), None))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_page_markdown() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("about")).unwrap();
        fs::write(root.path().join("about/page.md"), "# About Us\n\ntext").unwrap();

        let response = serve_page(
            State(state(root.path(), None)),
            Uri::from_static("/about"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<h1>About Us</h1>"));
        assert!(body.contains("<title>About Us - Tosky</title>"));
    }

    #[tokio::test]
    async fn test_serve_page_html_passthrough() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("static/faq")).unwrap();
        fs::write(
            root.path().join("static/faq/page.html"),
            "<h2>FAQ</h2><p>raw</p>",
        )
        .unwrap();

        let response = serve_page(
            State(state(root.path(), None)),
            Uri::from_static("/static/faq"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<h2>FAQ</h2><p>raw</p>"));
    }

    #[tokio::test]
    async fn test_serve_page_unknown_is_404() {
        let root = tempdir().unwrap();
        let response = serve_page(State(state(root.path(), None)), Uri::from_static("/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_blog_post() {
        let root = tempdir().unwrap();
        let response = serve_blog_post(
            State(state(root.path(), Some(Arc::new(OnePost)))),
            Path("hello-world".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<h1>Hello World</h1>"));
        assert!(body.contains("First post."));
    }

    #[tokio::test]
    async fn test_serve_blog_post_unknown_slug_is_404() {
        let root = tempdir().unwrap();
        let response = serve_blog_post(
            State(state(root.path(), Some(Arc::new(OnePost)))),
            Path("nope".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_blog_post_source_down_is_502() {
        let root = tempdir().unwrap();
        let response = serve_blog_post(
            State(state(root.path(), Some(Arc::new(DownSource)))),
            Path("hello-world".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_serve_blog_post_without_source_is_404() {
        let root = tempdir().unwrap();
        let response = serve_blog_post(
            State(state(root.path(), None)),
            Path("hello-world".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
