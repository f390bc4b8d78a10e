use axum::{extract::State, http::header, response::IntoResponse};

use crate::routes::AppState;

/// `GET /api/sitemap`. The document is regenerated from the content tree
/// and the post source on every request; nothing is cached between
/// requests.
pub async fn serve_sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let xml = tosky::sitemap::generate(&state.config, state.posts.as_deref()).await;

    ([(header::CONTENT_TYPE, "application/xml")], xml)
}
