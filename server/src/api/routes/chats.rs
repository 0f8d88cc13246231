//! Chat ingestion and read endpoints

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::decompression::RequestDecompressionLayer;
use vizor::{Chat, LogBatch};

use crate::api::types::ApiError;
use crate::data::ChatStore;
use crate::domain::{ChatItem, list_items};

/// Shared state for chat endpoints
#[derive(Clone)]
pub struct ChatsApiState {
    pub store: Arc<dyn ChatStore>,
}

/// Build chat routes (mounted under `/api`)
pub fn routes(store: Arc<dyn ChatStore>) -> Router<()> {
    let state = ChatsApiState { store };

    Router::new()
        .route(
            "/log",
            post(log_chats).layer(RequestDecompressionLayer::new()),
        )
        .route("/chat", get(get_chat))
        .route("/list", get(list_chats))
        .with_state(state)
}

/// Query parameters for `GET /chat`
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub id: Option<String>,
}

/// Append a batch of chats
pub async fn log_chats(
    State(state): State<ChatsApiState>,
    body: Result<Json<LogBatch>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(batch) =
        body.map_err(|rejection| ApiError::bad_request("INVALID_BODY", rejection.body_text()))?;

    let count = batch.chats.len();
    state
        .store
        .append(batch.chats)
        .await
        .map_err(ApiError::from_data)?;

    tracing::debug!(count, backend = state.store.backend_name(), "Chats logged");
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch one chat by id
pub async fn get_chat(
    State(state): State<ChatsApiState>,
    Query(query): Query<ChatQuery>,
) -> Result<Json<Chat>, ApiError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("MISSING_ID", "Query parameter 'id' is required"))?;

    let chat = state.store.get(&id).await.map_err(ApiError::from_data)?;
    chat.map(Json)
        .ok_or_else(|| ApiError::not_found("CHAT_NOT_FOUND", format!("Chat not found: {id}")))
}

/// List chat summaries, newest activity first
pub async fn list_chats(
    State(state): State<ChatsApiState>,
) -> Result<Json<Vec<ChatItem>>, ApiError> {
    let chats = state.store.list().await.map_err(ApiError::from_data)?;
    Ok(Json(list_items(&chats)))
}

#[cfg(test)]
#[path = "chats_tests.rs"]
mod tests;
