use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod service;
pub mod store;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
