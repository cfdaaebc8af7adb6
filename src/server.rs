// `server.rs` composes the HTTP application: it wires the random source, the
// state store client and the metrics registry into the handlers, mounts the
// routes the Dapr sidecar and callers expect, and stamps CORS headers on the
// responses.
use crate::{
    config::Config,
    handlers,
    metrics::Metrics,
    random::{NumberSource, ThreadRngSource},
    state_client::StateClient,
};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware;
use axum::response::Response;
use axum::{routing::{get, post}, Extension, Router};
use std::sync::Arc;
use tracing::info;

pub async fn run(config: Config) -> anyhow::Result<()> {
    let source: Arc<dyn NumberSource> = Arc::new(ThreadRngSource);
    let client = StateClient::new(config.dapr_base_url());
    let metrics = Metrics::new()?;

    info!(state_url = %client.state_url(), "using state store");
    let app = build_router(source, client, metrics);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP app. Every declared route also answers `OPTIONS` as a CORS
/// preflight; anything else falls through to axum's 404. The `Extension`
/// layers hand shared handles to the handlers and the outermost layer stamps
/// CORS headers on what the routes return.
pub fn build_router(source: Arc<dyn NumberSource>, client: StateClient, metrics: Metrics) -> Router {
    Router::new()
        .route("/randomNumber", get(handlers::random_number).options(preflight))
        .route("/savedNumber", get(handlers::saved_number).options(preflight))
        .route("/saveNumber", post(handlers::save_number).options(preflight))
        .route("/dapr/subscribe", get(handlers::subscribe).options(preflight))
        .route("/A", post(handlers::topic_a).options(preflight))
        .route("/B", post(handlers::topic_b).options(preflight))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(Extension(source))
        .layer(Extension(client))
        .layer(Extension(metrics))
        .layer(middleware::map_response(with_cors_headers))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn with_cors_headers(mut res: Response) -> Response {
    let headers = res.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET,POST,OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    res
}
