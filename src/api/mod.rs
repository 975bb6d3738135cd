//! REST API server for Sentiscope.
//!
//! Provides HTTP endpoints for:
//! - Service info and version
//! - Sentiment analysis chat

pub mod error;
pub mod routes;

use crate::analysis::SentimentAnalyzer;
use crate::session::{issue_session, SessionManager};
use anyhow::Result;
use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;

pub use routes::chat::{ChatRequest, ChatResponse, ChatState};

pub struct ApiServer {
    host: String,
    port: u16,
    analyzer: Arc<SentimentAnalyzer>,
    sessions: SessionManager,
}

impl ApiServer {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        analyzer: Arc<SentimentAnalyzer>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            analyzer,
            sessions,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.analyzer, self.sessions);

        let address = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&address).await?;

        info!("API server listening on http://{}", address);
        info!("Endpoints:");
        info!("  GET  /        - Service info");
        info!("  GET  /version - Get version info");
        info!("  POST /chat    - Analyze the sentiment of a message");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the full application router with the session layer applied.
pub fn router(analyzer: Arc<SentimentAnalyzer>, sessions: SessionManager) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/version", get(version))
        .merge(routes::chat::router(ChatState { analyzer }))
        .layer(ServiceBuilder::new().layer(middleware::from_fn_with_state(
            sessions,
            issue_session,
        )))
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "sentiscope",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "sentiscope"
    }))
}
