use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod password;
pub mod validation;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().merge(handlers::auth_routes(max_upload_bytes))
}
