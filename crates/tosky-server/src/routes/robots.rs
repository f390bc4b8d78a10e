use axum::{extract::State, http::header, response::IntoResponse};

use crate::routes::AppState;

/// `GET /robots.txt`. Allows everything and points crawlers at the sitemap
/// endpoint.
pub async fn serve_robots(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}",
        state.config.sitemap_url()
    );

    ([(header::CONTENT_TYPE, "text/plain")], body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::sync::Arc;
    use tosky::SiteConfig;

    #[tokio::test]
    async fn test_serve_robots_body() {
        let mut config: SiteConfig = toml::from_str("origin = \"https://tosky.top\"").unwrap();
        config.validate().unwrap();
        let state = AppState {
            config: Arc::new(config),
            posts: None,
        };

        let response = serve_robots(State(state)).await.into_response();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            "User-agent: *\nAllow: /\n\nSitemap: https://tosky.top/api/sitemap"
        );
    }
}
