//! HTTP gateway to the document service for pagegate.
//!
//! This crate provides the production implementation of the `Gateway` trait. Every query
//! becomes exactly one `POST <base>/<endpoint>` with the query as its JSON body and the
//! caller's credential as the `Token` header. Responses are decoded into the typed document
//! model; nothing is retried or cached.
//!
//! # Quick Start
//!
//! ```ignore
//! use pagegate::{prelude::*, http::HttpGateway};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = HttpGateway::builder("http://localhost:8081")
//!         .with_timeout(Duration::from_secs(10))
//!         .build()
//!         .await?;
//!     let facade = QueryFacade::new(gateway);
//!
//!     let page = facade
//!         .fetch_page(&RequestContext::with_token("secret"), "8f2c1b")
//!         .await?;
//!     println!("{:?}", page.title);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as pagegate_http;

pub mod gateway;

pub use gateway::{HttpGateway, HttpGatewayBuilder};
