use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};

use crate::auth::repo_types::Role;

/// One user plus their lifetime usage, aggregated from the ledger.
#[derive(Debug, Serialize, FromRow)]
pub struct UserStats {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub created_at: OffsetDateTime,
    pub total_requests: i64,
    pub total_tokens: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct AdminStats {
    pub total_users: i64,
    pub total_requests: i64,
    pub total_tokens: i64,
    pub active_users_today: i64,
    pub requests_today: i64,
    pub tokens_today: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UsageByModel {
    pub model: String,
    pub request_count: i64,
    pub total_tokens: i64,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct UsageByUser {
    pub user_id: i64,
    pub email: String,
    pub request_count: i64,
    pub total_tokens: i64,
}

#[derive(Debug, FromRow)]
pub struct DailyUsageRow {
    pub day: Date,
    pub request_count: i64,
    pub total_tokens: i64,
}

pub async fn list_users_with_usage(db: &PgPool) -> Result<Vec<UserStats>, sqlx::Error> {
    sqlx::query_as::<_, UserStats>(
        r#"
        SELECT u.id, u.email, u.role, u.created_at,
               COUNT(c.id) AS total_requests,
               COALESCE(SUM(c.prompt_tokens + c.completion_tokens), 0)::BIGINT AS total_tokens
        FROM users u
        LEFT JOIN chat_logs c ON c.user_id = u.id
        GROUP BY u.id, u.email, u.role, u.created_at
        ORDER BY u.id
        "#,
    )
    .fetch_all(db)
    .await
}

/// Global and today totals in one pass. Day boundaries are calendar days in
/// the database server's local time.
pub async fn global_stats(db: &PgPool) -> Result<AdminStats, sqlx::Error> {
    sqlx::query_as::<_, AdminStats>(
        r#"
        SELECT (SELECT COUNT(*) FROM users) AS total_users,
               COUNT(c.id) AS total_requests,
               COALESCE(SUM(c.prompt_tokens + c.completion_tokens), 0)::BIGINT AS total_tokens,
               COUNT(DISTINCT c.user_id) FILTER (WHERE date(c.created_at) = CURRENT_DATE)
                   AS active_users_today,
               COUNT(c.id) FILTER (WHERE date(c.created_at) = CURRENT_DATE) AS requests_today,
               COALESCE(SUM(c.prompt_tokens + c.completion_tokens)
                   FILTER (WHERE date(c.created_at) = CURRENT_DATE), 0)::BIGINT AS tokens_today
        FROM chat_logs c
        "#,
    )
    .fetch_one(db)
    .await
}

pub async fn usage_by_model(db: &PgPool) -> Result<Vec<UsageByModel>, sqlx::Error> {
    sqlx::query_as::<_, UsageByModel>(
        r#"
        SELECT model,
               COUNT(id) AS request_count,
               COALESCE(SUM(prompt_tokens + completion_tokens), 0)::BIGINT AS total_tokens,
               COALESCE(SUM(prompt_tokens), 0)::BIGINT AS prompt_tokens,
               COALESCE(SUM(completion_tokens), 0)::BIGINT AS completion_tokens
        FROM chat_logs
        GROUP BY model
        ORDER BY request_count DESC
        "#,
    )
    .fetch_all(db)
    .await
}

/// Top ten users by token spend. Records of deleted accounts keep their
/// user_id, hence the LEFT JOIN.
pub async fn usage_by_user(db: &PgPool) -> Result<Vec<UsageByUser>, sqlx::Error> {
    sqlx::query_as::<_, UsageByUser>(
        r#"
        SELECT c.user_id,
               COALESCE(u.email, '(deleted)') AS email,
               COUNT(c.id) AS request_count,
               COALESCE(SUM(c.prompt_tokens + c.completion_tokens), 0)::BIGINT AS total_tokens
        FROM chat_logs c
        LEFT JOIN users u ON u.id = c.user_id
        GROUP BY c.user_id, u.email
        ORDER BY total_tokens DESC
        LIMIT 10
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn daily_usage(db: &PgPool, days: i32) -> Result<Vec<DailyUsageRow>, sqlx::Error> {
    sqlx::query_as::<_, DailyUsageRow>(
        r#"
        SELECT date(created_at) AS day,
               COUNT(id) AS request_count,
               COALESCE(SUM(prompt_tokens + completion_tokens), 0)::BIGINT AS total_tokens
        FROM chat_logs
        WHERE date(created_at) >= CURRENT_DATE - $1::INT
        GROUP BY day
        ORDER BY day
        "#,
    )
    .bind(days)
    .fetch_all(db)
    .await
}

/// Returns the updated user's id, or None if no such user.
pub async fn set_role(db: &PgPool, user_id: i64, role: Role) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE users SET role = $2 WHERE id = $1 RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(role)
    .fetch_optional(db)
    .await
}

/// Deletes only the user row. Their chat records stay in the ledger.
pub async fn delete_user(db: &PgPool, user_id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        DELETE FROM users WHERE id = $1 RETURNING id
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}
