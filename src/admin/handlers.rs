use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch},
    Json, Router,
};
use tracing::{info, instrument};

use crate::admin::dto::{AdminDashboard, DailyUsage, MessageResponse, RoleQuery, StatsQuery};
use crate::admin::repo;
use crate::admin::repo::UserStats;
use crate::auth::extractors::AdminUser;
use crate::auth::repo_types::Role;
use crate::error::ApiError;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/stats", get(stats))
        .route("/admin/users/:id/role", patch(set_role))
        .route("/admin/users/:id", delete(delete_user))
}

#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserStats>>, ApiError> {
    let users = repo::list_users_with_usage(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(q): Query<StatsQuery>,
) -> Result<Json<AdminDashboard>, ApiError> {
    let stats = repo::global_stats(&state.db).await?;
    let usage_by_model = repo::usage_by_model(&state.db).await?;
    let usage_by_user = repo::usage_by_user(&state.db).await?;
    let daily_usage = repo::daily_usage(&state.db, q.days.max(0))
        .await?
        .into_iter()
        .map(DailyUsage::from)
        .collect();

    Ok(Json(AdminDashboard {
        stats,
        usage_by_model,
        usage_by_user,
        daily_usage,
    }))
}

#[instrument(skip(state, admin))]
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
    Query(q): Query<RoleQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    let role: Role = q
        .role
        .parse()
        .map_err(|_| ApiError::InvalidRequest("Role must be 'user' or 'admin'".into()))?;

    // No self role changes at all, not even admin -> admin
    if user_id == admin.id {
        return Err(ApiError::SelfModification(
            "Cannot change your own role".into(),
        ));
    }

    repo::set_role(&state.db, user_id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id, role = %role, admin_id = admin.id, "user role updated");
    Ok(Json(MessageResponse {
        message: format!("User role updated to {role}"),
    }))
}

/// Removes the account. The user's chat records are left in the ledger.
#[instrument(skip(state, admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if user_id == admin.id {
        return Err(ApiError::SelfModification(
            "Cannot delete your own account".into(),
        ));
    }

    repo::delete_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id, admin_id = admin.id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use time::OffsetDateTime;

    fn admin_user(id: i64) -> AdminUser {
        AdminUser(User {
            id,
            email: "admin@x.com".into(),
            password_hash: "hash".into(),
            role: Role::Admin,
            created_at: OffsetDateTime::UNIX_EPOCH,
        })
    }

    #[tokio::test]
    async fn self_role_change_is_rejected_even_when_already_admin() {
        let state = AppState::fake();
        let err = set_role(
            State(state),
            admin_user(1),
            Path(1),
            Query(RoleQuery {
                role: "admin".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::SelfModification(_)));
    }

    #[tokio::test]
    async fn self_deletion_is_rejected() {
        let state = AppState::fake();
        let err = delete_user(State(state), admin_user(3), Path(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SelfModification(_)));
    }

    #[tokio::test]
    async fn unknown_role_name_is_rejected() {
        let state = AppState::fake();
        let err = set_role(
            State(state),
            admin_user(1),
            Path(2),
            Query(RoleQuery {
                role: "root".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
