pub mod domains;
pub mod pages;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new().nest("/domains", domains::router())
}
