use parley_backend::{Backend, HttpBackend, InMemoryBackend};
use parley_session::Coordinator;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley_web::{
    build_router,
    config::{BackendKind, Config},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Parley web server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let backend = build_backend(&config)?;
    let coordinator = Coordinator::new(backend).with_default_theme(config.ui.default_theme);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, coordinator));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Chat UI: http://{}/", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_backend(config: &Config) -> anyhow::Result<Arc<dyn Backend>> {
    match config.backend.kind {
        BackendKind::Http => {
            tracing::info!("Using HTTP backend at {}", config.backend.base_url);
            let mut backend = HttpBackend::new(
                &config.backend.base_url,
                Duration::from_millis(config.backend.timeout_ms),
            )?;
            if let Some(key) = &config.backend_api_key {
                backend = backend.with_api_key(key.clone());
            }
            Ok(Arc::new(backend))
        }
        BackendKind::Memory => {
            tracing::warn!("Using in-memory backend, conversations are lost on restart");
            Ok(Arc::new(
                InMemoryBackend::new().with_fragment_delay(Duration::from_millis(30)),
            ))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
