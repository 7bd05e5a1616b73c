use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
mod repo;

pub fn router() -> Router<AppState> {
    handlers::admin_routes()
}
