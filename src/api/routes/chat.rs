//! Chat endpoint.
//!
//! Provides HTTP endpoints for:
//! - Analyzing a message (POST /chat)

use crate::analysis::SentimentAnalyzer;
use crate::api::error::ApiResult;
use crate::session::SessionId;
use axum::{extract::State, response::Json, routing::post, Extension, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Request body for the chat endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Clone)]
pub struct ChatState {
    pub analyzer: Arc<SentimentAnalyzer>,
}

/// Creates the chat router.
pub fn router(state: ChatState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(state)
}

/// Analyzes the sentiment of the posted message.
///
/// A body that is not JSON, or has no `message`, is treated as an empty
/// message and answered with 400.
async fn chat(
    State(state): State<ChatState>,
    session: Option<Extension<SessionId>>,
    body: Option<Json<ChatRequest>>,
) -> ApiResult<Json<ChatResponse>> {
    if let Some(Extension(SessionId(id))) = &session {
        debug!("Chat request for session {}", id);
    }

    let message = body
        .and_then(|Json(req)| req.message)
        .unwrap_or_default();

    let response = state.analyzer.analyze(&message).await?;
    Ok(Json(ChatResponse { response }))
}
