use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::{
        predicate::{DefaultPredicate, NotForContentType, Predicate},
        CompressionLayer,
    },
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    handlers::stream,
    middleware::logging,
    routes::{health, pages, sessions},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    // Browser surface
    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/s/:session_id", get(pages::show_session))
        .route("/s/:session_id/new", post(pages::new_chat))
        .route("/s/:session_id/theme", post(pages::set_theme))
        .route("/s/:session_id/messages", post(stream::send_message_page))
        .route(
            "/s/:session_id/threads/:thread_id/select",
            post(pages::select_thread),
        )
        .route(
            "/s/:session_id/threads/:thread_id/delete",
            post(pages::delete_thread),
        );

    // JSON / SSE surface
    let api_routes = Router::new()
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:session_id", get(sessions::get_session))
        .route("/sessions/:session_id/theme", post(sessions::set_theme))
        .route("/sessions/:session_id/threads", post(sessions::new_thread))
        .route(
            "/sessions/:session_id/threads/:thread_id",
            axum::routing::delete(sessions::delete_thread),
        )
        .route(
            "/sessions/:session_id/threads/:thread_id/select",
            post(sessions::select_thread),
        )
        .route(
            "/sessions/:session_id/messages",
            post(stream::send_message_stream),
        );

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(page_routes)
        .nest("/api", api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(build_compression_layer())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Streamed pages must reach the browser fragment by fragment, so HTML is
/// never compressed
fn build_compression_layer() -> CompressionLayer<impl Predicate> {
    CompressionLayer::new()
        .compress_when(DefaultPredicate::new().and(NotForContentType::const_new("text/html")))
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::new();
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();

        cors.allow_origin(origins)
    }
}
