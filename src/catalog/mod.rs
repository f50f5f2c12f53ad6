use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
mod sql;
pub mod value;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::catalog_routes())
}
