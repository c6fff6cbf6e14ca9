//! Upstream gateway abstraction for the document service.
//!
//! This module defines the traits that abstract over the ways of reaching the document
//! service, so the facade works the same against the real HTTP service and against a
//! simulated one.
//!
//! # Overview
//!
//! The [`Gateway`] trait is the sole owner of the request/response contract with the
//! document service. Each operation is a single, shape-preserving forward: one outbound
//! call, no retries, no caching, no orchestration across calls.
//!
//! # Traits
//!
//! - [`Gateway`]: The core trait for gateways
//! - [`DynGateway`]: A trait for dynamic dispatch over gateway implementations
//! - [`GatewayBuilder`]: Factory trait for creating gateway instances
//!
//! # Examples
//!
//! ```ignore
//! use pagegate_core::{context::RequestContext, gateway::Gateway, query::PageQuery};
//!
//! let gateway = MyGatewayImpl::new();
//! let ctx = RequestContext::with_token("secret");
//!
//! let page = gateway.fetch_page(&PageQuery::new("8f2c1b"), &ctx).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::{any::Any, fmt, fmt::Debug, sync::Arc};

use crate::{
    context::RequestContext,
    error::{FacadeError, FacadeResult},
    model::{Collection, Page},
    query::{CollectionQuery, PageQuery},
};

/// The document service endpoints the facade calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST <base>/fetchPage`
    FetchPage,
    /// `POST <base>/fetchCollection`
    FetchCollection,
}

impl Endpoint {
    /// Returns the path segment of this endpoint, relative to the service's base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::FetchPage => "fetchPage",
            Endpoint::FetchCollection => "fetchCollection",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Abstract interface for reaching the document service.
///
/// # Thread Safety
///
/// Implementations must be thread-safe. A single gateway is shared by every concurrent
/// request and must not keep per-request state; per-request state lives in the
/// [`RequestContext`] passed to each call.
///
/// # Credential Forwarding
///
/// Implementations forward `ctx.credential()` byte-for-byte as the [`TOKEN_HEADER`] of the
/// outbound call, and send no such header when the context has no credential.
///
/// # Error Handling
///
/// Implementations report transport failures as [`FacadeError::Transport`] or
/// [`FacadeError::Timeout`], non-success statuses as [`FacadeError::UpstreamStatus`] and
/// unreadable bodies as [`FacadeError::MalformedResponse`]. [`decode_response`] does the
/// last two.
///
/// [`TOKEN_HEADER`]: crate::context::TOKEN_HEADER
#[async_trait]
pub trait Gateway: Send + Sync + Debug {
    /// Fetches a single page.
    ///
    /// The query is sent verbatim as the body of one call to [`Endpoint::FetchPage`].
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page>;

    /// Fetches a filtered view of a collection.
    ///
    /// The full argument set is sent verbatim as the body of one call to
    /// [`Endpoint::FetchCollection`]. Pages come back in the order the service returns them.
    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection>;

    /// Cleanly shuts down the gateway, releasing its resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> FacadeResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<G> Gateway for &G
where
    G: Gateway,
{
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page> {
        (*self).fetch_page(query, ctx).await
    }

    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection> {
        (*self).fetch_collection(query, ctx).await
    }
}

#[async_trait]
impl<G> Gateway for Arc<G>
where
    G: Gateway,
{
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page> {
        (**self).fetch_page(query, ctx).await
    }

    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection> {
        (**self).fetch_collection(query, ctx).await
    }
}

/// Object-safe counterpart of [`Gateway`], for choosing a gateway at runtime.
///
/// Implemented for every `Gateway + 'static`.
#[async_trait]
pub trait DynGateway: Send + Sync + Debug {
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page>;
    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection>;
    async fn shutdown_boxed(self: Box<Self>) -> FacadeResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<G: Gateway + 'static> DynGateway for G {
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page> {
        Gateway::fetch_page(self, query, ctx).await
    }

    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection> {
        Gateway::fetch_collection(self, query, ctx).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> FacadeResult<()> {
        Gateway::shutdown(*self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[async_trait]
impl Gateway for Box<dyn DynGateway> {
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page> {
        DynGateway::fetch_page(&**self, query, ctx).await
    }

    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection> {
        DynGateway::fetch_collection(&**self, query, ctx).await
    }

    async fn shutdown(self) -> FacadeResult<()> {
        DynGateway::shutdown_boxed(self).await
    }
}

impl dyn DynGateway {
    /// Attempts to downcast to a concrete gateway type.
    pub fn downcast_ref<G: Gateway + 'static>(&self) -> Option<&G> {
        self.as_any().downcast_ref::<G>()
    }
}

/// Factory trait for building gateways.
#[async_trait]
pub trait GatewayBuilder {
    type Gateway: Gateway;

    async fn build(self) -> FacadeResult<Self::Gateway>;
}

/// Translates a document service response into a typed result.
///
/// Any status outside `200..=299` becomes [`FacadeError::UpstreamStatus`] carrying the
/// response body as its message (or a generic message when the body is empty); the body is
/// not parsed in that case. A success body that is not valid JSON of the expected shape
/// becomes [`FacadeError::MalformedResponse`].
///
/// # Example
///
/// ```ignore
/// let page: Page = decode_response(Endpoint::FetchPage, 200, br#"{"title":"Hi"}"#)?;
/// ```
pub fn decode_response<T: DeserializeOwned>(
    endpoint: Endpoint,
    status: u16,
    body: &[u8],
) -> FacadeResult<T> {
    if !(200..=299).contains(&status) {
        let message = String::from_utf8_lossy(body).trim().to_string();

        return Err(FacadeError::UpstreamStatus {
            status,
            message: if message.is_empty() {
                format!("{endpoint} failed without a message")
            } else {
                message
            },
        });
    }

    serde_json::from_slice(body)
        .map_err(|e| FacadeError::MalformedResponse(format!("{endpoint}: {e}")))
}
