//! In-memory document service for pagegate.
//!
//! This crate provides a thread-safe, simulated document service implementing the
//! `Gateway` trait. It answers from raw JSON payloads held in memory and records every
//! request it receives, which makes it the gateway of choice for tests and local
//! development.
//!
//! # Features
//!
//! - **Raw payloads** - Pages and collections are stored as JSON and decoded on every call,
//!   exactly like responses from the real service
//! - **Request log** - Every outbound body and token is recorded for inspection
//! - **Scripted failures** - Any endpoint can be made to answer with an error status
//! - **Token check** - Optionally rejects callers that do not present a given token
//!
//! # Quick Start
//!
//! ```ignore
//! use pagegate::{prelude::*, memory::InMemoryService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = InMemoryService::builder()
//!         .with_page("p1", json!({ "title": "Hello" }))
//!         .build()
//!         .await?;
//!     let facade = QueryFacade::new(service);
//!
//!     let page = facade.fetch_page(&RequestContext::anonymous(), "p1").await?;
//!     assert_eq!(page.title.as_deref(), Some("Hello"));
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as pagegate_memory;

pub mod service;

pub use service::{InMemoryService, InMemoryServiceBuilder, RecordedRequest};
