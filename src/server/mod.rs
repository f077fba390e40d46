//! HTTP server: shared context, router and serve loop.

pub mod error;
pub mod responses;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::downloader::Extractor;

/// State shared by all handlers. Both fields are read-only after startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub extractor: Arc<dyn Extractor>,
}

impl AppContext {
    pub fn new(config: AppConfig, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            config: Arc::new(config),
            extractor,
        }
    }
}

pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/info", get(routes::info))
        .route("/formats", get(routes::formats))
        .route("/download", get(routes::download))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind the configured address and serve until Ctrl-C or SIGTERM.
pub async fn serve(ctx: AppContext) -> std::io::Result<()> {
    let addr = ctx.config.listen_addr();
    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
