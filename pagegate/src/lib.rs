//! Main pagegate crate providing a typed query facade over a page and block document service.
//!
//! This crate is the primary entry point for users of pagegate. It re-exports the core
//! types from the sub-crates and gives access to the available gateways.
//!
//! # Features
//!
//! - **Typed document model** - Pages, collections and a block content union decoded from loose JSON
//! - **Parse-time content dispatch** - Each block's `type` selects its content variant once, at the data boundary
//! - **Explicit credentials** - The caller's token travels in a [`context::RequestContext`], never in global state
//! - **Multiple gateways** - HTTP for the real document service, in-memory for tests and development
//!
//! # Quick Start
//!
//! ```ignore
//! use pagegate::{prelude::*, memory::InMemoryService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Stand in for the document service
//!     let service = InMemoryService::builder()
//!         .with_page("p1", json!({
//!             "title": "Errands",
//!             "content": [{
//!                 "id": "b1",
//!                 "type": "TodoBlockContent",
//!                 "content": { "checked": false, "items": [{ "text": "buy milk" }] }
//!             }]
//!         }))
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let facade = QueryFacade::new(service);
//!     let ctx = RequestContext::with_token("secret");
//!
//!     let page = facade.fetch_page(&ctx, "p1").await.unwrap();
//!
//!     for block in page.blocks() {
//!         if let Some(BlockContent::Todo(todo)) = &block.content {
//!             println!("[{}] {}", if todo.checked { "x" } else { " " }, block.content.as_ref().unwrap().plain_text());
//!         }
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! A facade can be converted into a [`facade::DynQueryFacade`] with `into_dyn`, which lets
//! the gateway be chosen at runtime (for example from configuration):
//!
//! ```ignore
//! use pagegate::{prelude::*, http::HttpGateway, memory::InMemoryService};
//!
//! let facade: DynQueryFacade = match upstream_url {
//!     Some(url) => QueryFacade::new(HttpGateway::builder(&url).build().await?).into_dyn(),
//!     None => QueryFacade::new(InMemoryService::new()).into_dyn(),
//! };
//! ```
//!
//! # Gateways
//!
//! - [`memory`] - Simulated document service for development and testing
//! - [`http`] - The real document service over HTTP (requires the `http` feature)

pub mod prelude;

pub use pagegate_core::{content, context, error, facade, gateway, model, query};

// Re-export JSON types for convenience, opaque model fields are `serde_json::Value`
pub use serde_json;

/// In-memory gateway implementations.
pub mod memory {
    pub use pagegate_memory::{InMemoryService, InMemoryServiceBuilder, RecordedRequest};
}

/// HTTP gateway implementations.
///
/// This module is only available when the `http` feature is enabled.
#[cfg(feature = "http")]
pub mod http {
    pub use pagegate_http::{HttpGateway, HttpGatewayBuilder};
}
