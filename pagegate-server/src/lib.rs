//! HTTP front end for the pagegate query facade.
//!
//! Exposes `fetchPage` and `fetchCollection` as JSON endpoints, forwarding the caller's
//! `Token` header to the document service and mapping facade errors to HTTP statuses.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use pagegate_core::{error::FacadeResult, facade::QueryFacade, gateway::GatewayBuilder};
use pagegate_http::HttpGateway;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use state::AppState;

/// Builds the router with tracing and CORS layers applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Builds application state backed by the HTTP gateway described in `config`.
pub async fn state_from_config(config: &Config) -> FacadeResult<AppState> {
    let gateway = HttpGateway::builder(&config.upstream.base_url)
        .with_timeout(config.upstream.timeout())
        .build()
        .await?;

    Ok(AppState::new(QueryFacade::new(gateway).into_dyn()))
}
