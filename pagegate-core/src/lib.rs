//! A typed query facade over a loosely-structured page and block document service.
//!
//! This crate is the core of the pagegate project and provides:
//!
//! - **Document model** ([`model`]) - Pages, blocks, collections, properties and metadata
//! - **Content-type resolution** ([`content`]) - Dispatch of block content onto its typed variant
//! - **Queries** ([`query`]) - The page and collection queries forwarded to the document service
//! - **Request context** ([`context`]) - The caller's credential, threaded through each request
//! - **Gateway abstraction** ([`gateway`]) - Traits for talking to the upstream document service
//! - **Query facade** ([`facade`]) - The validated entry points callers use
//! - **Error handling** ([`error`]) - Error kinds and result types
//!
//! # Example
//!
//! ```ignore
//! use pagegate_core::{context::RequestContext, facade::QueryFacade};
//!
//! let facade = QueryFacade::new(gateway);
//! let ctx = RequestContext::with_token("secret");
//!
//! let page = facade.fetch_page(&ctx, "8f2c1b").await?;
//!
//! for block in page.blocks() {
//!     println!("{} ({})", block.id, block.block_type);
//! }
//! ```

pub mod content;
pub mod context;
pub mod error;
pub mod facade;
pub mod gateway;
pub mod model;
pub mod query;
