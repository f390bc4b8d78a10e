use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::{net::TcpSocket, signal};
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{debug, warn, Level};

use tosky::content::{HttpPostSource, PostSource};
use tosky::SiteConfig;

use crate::routes::{pages, robots, sitemap, AppState};
use crate::server_utils::{find_open_port, log_server_start, CustomOnResponse};

pub async fn start_server(config: SiteConfig, host: bool, start_time: std::time::Instant) {
    let posts: Option<Arc<dyn PostSource>> = match &config.posts.api_url {
        Some(api_url) => {
            let timeout = Duration::from_secs(config.posts.fetch_timeout_secs);
            match HttpPostSource::new(api_url.clone(), timeout) {
                Ok(source) => Some(Arc::new(source)),
                Err(err) => {
                    warn!(name: "server", "Post source client unavailable, serving static routes only: {}", err);
                    None
                }
            }
        }
        None => None,
    };

    let static_assets_dir = config
        .static_assets_dir
        .clone()
        .filter(|dir| dir.is_dir());

    let configured_port = config.server.port;

    let state = AppState {
        config: Arc::new(config),
        posts,
    };

    let mut router = Router::new()
        .route("/", get(pages::serve_home))
        .route("/api/sitemap", get(sitemap::serve_sitemap))
        .route("/robots.txt", get(robots::serve_robots))
        .route("/blog/{slug}", get(pages::serve_blog_post))
        .fallback(get(pages::serve_page));

    if let Some(dir) = static_assets_dir {
        router = router.nest_service("/assets", ServeDir::new(dir));
    }

    let router = router
        .layer(middleware::from_fn(attach_uri))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(CustomOnResponse),
        )
        .with_state(state);

    let addr = if host {
        IpAddr::from([0, 0, 0, 0])
    } else {
        IpAddr::from([127, 0, 0, 1])
    };

    let port = find_open_port(&addr, configured_port).await;
    let socket = TcpSocket::new_v4().unwrap();
    let _ = socket.set_reuseaddr(true);

    let socket_addr = SocketAddr::new(addr, port);
    socket.bind(socket_addr).unwrap();

    let listener = socket.listen(1024).unwrap();

    debug!("listening on {}", listener.local_addr().unwrap());

    log_server_start(start_time, host, listener.local_addr().unwrap());

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

/// Makes the request URI available to the response logger; `TraceLayer`'s
/// `OnResponse` hook only sees the response.
async fn attach_uri(req: Request, next: Next) -> Response {
    let uri = req.uri().clone();
    let mut res = next.run(req).await;
    res.extensions_mut().insert(uri);
    res
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
