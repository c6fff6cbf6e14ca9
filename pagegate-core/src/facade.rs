//! The query surface callers use.
//!
//! This module provides the two entry points of the facade, `fetch_page` and
//! `fetch_collection`. They check that required identifiers are present, then make exactly
//! one gateway call with the caller's [`RequestContext`]. There is no other logic here:
//! results and errors are passed through as the gateway returns them.
//!
//! - [`QueryFacade`] - Facade bound to a specific gateway type
//! - [`DynQueryFacade`] - Facade over a gateway chosen at runtime
//!
//! # Example
//!
//! ```ignore
//! use pagegate_core::{context::RequestContext, facade::QueryFacade, query::CollectionQuery};
//!
//! let facade = QueryFacade::new(gateway).into_dyn();
//! let ctx = RequestContext::with_token(token);
//!
//! let collection = facade
//!     .fetch_collection(&ctx, CollectionQuery::builder("tasks", "board").limit("20").build())
//!     .await?;
//! ```

use crate::{
    context::RequestContext,
    error::FacadeResult,
    gateway::{DynGateway, Gateway},
    model::{Collection, Page},
    query::{CollectionQuery, PageQuery},
};

/// A query facade bound to a specific gateway implementation.
///
/// The facade holds no per-request state and can be shared freely between concurrent
/// requests (e.g. behind an `Arc`).
///
/// # Type Parameters
///
/// * `G` - The gateway implementation type
#[derive(Debug)]
pub struct QueryFacade<G: Gateway> {
    gateway: G,
}

/// A query facade over a dynamically dispatched gateway.
pub type DynQueryFacade = QueryFacade<Box<dyn DynGateway>>;

impl<G: Gateway> QueryFacade<G> {
    /// Creates a new facade over the given gateway.
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Returns the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetches a page by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without calling the document service, if `page_id` is
    /// empty. Otherwise returns whatever error the gateway reports.
    #[tracing::instrument(
        name = "fetch_page",
        skip(self, ctx),
        fields(authenticated = ctx.credential().is_some())
    )]
    pub async fn fetch_page(&self, ctx: &RequestContext, page_id: &str) -> FacadeResult<Page> {
        let query = PageQuery::new(page_id);
        query.validate()?;

        let page = self
            .gateway
            .fetch_page(&query, ctx)
            .await
            .inspect_err(|err| tracing::warn!(kind = err.kind().as_str(), error = %err, "fetchPage failed"))?;

        tracing::debug!(blocks = page.blocks().len(), "page fetched");

        Ok(page)
    }

    /// Fetches a filtered view of a collection.
    ///
    /// Filters, cursor and limit are forwarded exactly as given.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without calling the document service, if the collection
    /// id or view id is empty. Otherwise returns whatever error the gateway reports.
    #[tracing::instrument(
        name = "fetch_collection",
        skip(self, ctx, query),
        fields(
            collection_id = %query.collection_id,
            collection_view_id = %query.collection_view_id,
            filters = query.filters.as_ref().map_or(0, Vec::len),
            authenticated = ctx.credential().is_some(),
        )
    )]
    pub async fn fetch_collection(
        &self,
        ctx: &RequestContext,
        query: CollectionQuery,
    ) -> FacadeResult<Collection> {
        query.validate()?;

        let collection = self
            .gateway
            .fetch_collection(&query, ctx)
            .await
            .inspect_err(|err| tracing::warn!(kind = err.kind().as_str(), error = %err, "fetchCollection failed"))?;

        tracing::debug!(pages = collection.pages().len(), "collection fetched");

        Ok(collection)
    }

    /// Shuts down the underlying gateway.
    pub async fn shutdown(self) -> FacadeResult<()> {
        self.gateway.shutdown().await
    }
}

impl<G: Gateway + 'static> QueryFacade<G> {
    /// Erases the gateway type, for choosing gateways at runtime.
    pub fn into_dyn(self) -> DynQueryFacade {
        QueryFacade::new(Box::new(self.gateway) as Box<dyn DynGateway>)
    }
}

impl DynQueryFacade {
    /// Returns the gateway as its concrete type, if it is a `G`.
    pub fn gateway_as<G: Gateway + 'static>(&self) -> Option<&G> {
        self.gateway.downcast_ref::<G>()
    }
}
