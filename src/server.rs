//! HTTP surface: chat endpoint, health check, the chat page and its assets.
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | `/` | GET | chat page |
//! | `/static/*` | GET | stylesheets, scripts, product images |
//! | `/chat` | POST | one chat turn, `{message}` → `{reply, products}` |
//! | `/health` | GET | liveness and catalog size |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::chat::{ChatReply, ChatRequest, ChatService};
use crate::llm::LlmProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub static_dir: PathBuf,
    pub index_file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    products: usize,
}

pub fn router<P>(service: Arc<ChatService<P>>, assets: &AssetPaths) -> Router
where
    P: LlmProvider + Send + Sync + 'static,
{
    Router::new()
        .route("/chat", post(chat::<P>))
        .route("/health", get(health::<P>))
        .route_service("/", ServeFile::new(&assets.index_file))
        .nest_service("/static", ServeDir::new(&assets.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|err| anyhow!("Failed to read listener address: {err}"))?;
    info!(%addr, "chat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| anyhow!("Server error: {err}"))
}

async fn chat<P>(
    State(service): State<Arc<ChatService<P>>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply>
where
    P: LlmProvider + Send + Sync + 'static,
{
    Json(service.reply(&request.message).await)
}

async fn health<P>(State(service): State<Arc<ChatService<P>>>) -> Json<HealthResponse>
where
    P: LlmProvider + Send + Sync + 'static,
{
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        products: service.catalog().len(),
    })
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
