//! HTTP routes

pub mod health;
pub mod query;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/fetchPage", post(query::fetch_page))
        .route("/fetchCollection", post(query::fetch_collection))
}
