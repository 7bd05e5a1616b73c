use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// One prompt/response exchange. Rows are append-only: nothing in the crate
/// updates or deletes them, and they survive deletion of the owning user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatLog {
    pub id: i64,
    pub user_id: i64,
    pub prompt: String,
    pub response: String,
    pub model: String,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub created_at: OffsetDateTime,
}
