use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::auth::extractors::AuthUser;
use crate::chat::dto::{ChatRequest, ChatResponse, HistoryItem, HistoryQuery};
use crate::chat::repo_types::ChatLog;
use crate::error::ApiError;
use crate::llm::resolve_model;
use crate::state::AppState;

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/models", get(list_models))
        .route("/chat/history", get(history))
}

/// Send a prompt to the LLM and get a response. The ledger row is written
/// only after the provider call succeeds.
#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.prompt.trim().is_empty() {
        return Err(ApiError::InvalidRequest("Prompt must not be empty".into()));
    }

    let model = resolve_model(payload.model.as_deref(), &state.config.llm).to_string();
    let started = std::time::Instant::now();

    let completion = state
        .llm
        .complete(&model, &payload.prompt)
        .await
        .map_err(|e| {
            error!(user_id, model = %model, error = %e, "chat failed");
            ApiError::Provider(e.to_string())
        })?;

    let record = ChatLog::create(
        &state.db,
        user_id,
        &payload.prompt,
        &completion.text,
        &model,
        completion.prompt_tokens,
        completion.completion_tokens,
    )
    .await?;

    info!(
        user_id,
        model = %model,
        latency_ms = started.elapsed().as_millis() as u64,
        total_tokens = record.prompt_tokens + record.completion_tokens,
        "chat completed"
    );

    Ok(Json(ChatResponse {
        response: record.response,
        model: record.model,
        prompt_tokens: record.prompt_tokens,
        completion_tokens: record.completion_tokens,
    }))
}

/// The statically configured model list; no provider round trip.
#[instrument(skip(state))]
pub async fn list_models(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Json<Vec<String>> {
    Json(state.config.llm.models.clone())
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryItem>>, ApiError> {
    let logs = ChatLog::list_by_user(&state.db, user_id, q.limit).await?;
    Ok(Json(logs.into_iter().map(HistoryItem::from).collect()))
}
