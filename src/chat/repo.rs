use sqlx::PgPool;

use crate::chat::repo_types::ChatLog;

impl ChatLog {
    /// Append one exchange to the ledger. Called only after the provider
    /// responded successfully, so a failed call never leaves a partial row.
    pub async fn create(
        db: &PgPool,
        user_id: i64,
        prompt: &str,
        response: &str,
        model: &str,
        prompt_tokens: i32,
        completion_tokens: i32,
    ) -> Result<ChatLog, sqlx::Error> {
        sqlx::query_as::<_, ChatLog>(
            r#"
            INSERT INTO chat_logs (user_id, prompt, response, model, prompt_tokens, completion_tokens)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, prompt, response, model, prompt_tokens, completion_tokens, created_at
            "#,
        )
        .bind(user_id)
        .bind(prompt)
        .bind(response)
        .bind(model)
        .bind(prompt_tokens)
        .bind(completion_tokens)
        .fetch_one(db)
        .await
    }

    /// The calling user's own records, most recent first, capped at `limit`.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatLog>, sqlx::Error> {
        sqlx::query_as::<_, ChatLog>(
            r#"
            SELECT id, user_id, prompt, response, model, prompt_tokens, completion_tokens, created_at
            FROM chat_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await
    }
}
