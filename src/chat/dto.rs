use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chat::repo_types::ChatLog;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub model: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: i64,
    pub prompt: String,
    pub response: String,
    pub model: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub created_at: OffsetDateTime,
}

impl From<ChatLog> for HistoryItem {
    fn from(log: ChatLog) -> Self {
        Self {
            id: log.id,
            prompt: log.prompt,
            response: log.response,
            model: log.model,
            prompt_tokens: log.prompt_tokens,
            completion_tokens: log.completion_tokens,
            created_at: log.created_at,
        }
    }
}
