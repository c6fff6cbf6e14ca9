//! Simulated document service.
//!
//! This module provides a gateway that plays the part of the document service: it stores
//! response payloads as raw JSON text in HashMaps behind async-safe read-write locks, and
//! pushes every answer through the same [`decode_response`] path as the HTTP gateway.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;

use pagegate_core::{
    context::{Credential, RequestContext},
    error::FacadeResult,
    gateway::{Endpoint, Gateway, GatewayBuilder, decode_response},
    model::{Collection, Page},
    query::{CollectionQuery, PageQuery},
};

type PayloadMap = HashMap<String, String>;

/// One request received by an [`InMemoryService`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// The endpoint that was called.
    pub endpoint: Endpoint,
    /// The JSON body, exactly as an HTTP gateway would have sent it.
    pub body: Value,
    /// The forwarded credential, if any.
    pub token: Option<Credential>,
}

/// Thread-safe in-memory stand-in for the document service.
///
/// Pages are looked up by `pageId` and collections by `collectionId` (the view id is
/// recorded but not used for lookup). Unknown ids answer with status 404. Payloads are
/// stored as raw text, so a malformed body can be served on purpose.
///
/// # Thread Safety
///
/// `InMemoryService` is cloneable and uses `Arc`-wrapped internal state. Clones share the
/// same payloads, failures and request log.
///
/// # Example
///
/// ```ignore
/// use pagegate_memory::InMemoryService;
/// use pagegate_core::{context::RequestContext, gateway::Gateway, query::PageQuery};
/// use serde_json::json;
///
/// let service = InMemoryService::new();
/// service.insert_page("p1", json!({ "title": "Hello" })).await;
///
/// let page = service.fetch_page(&PageQuery::new("p1"), &RequestContext::anonymous()).await?;
/// assert_eq!(service.requests().await.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryService {
    pages: Arc<RwLock<PayloadMap>>,
    collections: Arc<RwLock<PayloadMap>>,
    /// Endpoint -> (status, message) answered instead of the stored payload.
    failures: Arc<RwLock<HashMap<Endpoint, (u16, String)>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    required_token: Option<Credential>,
}

impl InMemoryService {
    /// Creates an empty service that accepts any caller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing an `InMemoryService` with preloaded payloads.
    pub fn builder() -> InMemoryServiceBuilder {
        InMemoryServiceBuilder::default()
    }

    /// Stores the page payload answered for `page_id`, replacing any previous one.
    pub async fn insert_page(&self, page_id: &str, payload: Value) {
        self.insert_raw_page(page_id, payload.to_string()).await
    }

    /// Stores a raw page response body, which need not be valid JSON.
    pub async fn insert_raw_page(&self, page_id: &str, body: impl Into<String>) {
        self.pages
            .write()
            .await
            .insert(page_id.to_string(), body.into());
    }

    /// Stores the collection payload answered for `collection_id`, replacing any previous one.
    pub async fn insert_collection(&self, collection_id: &str, payload: Value) {
        self.collections
            .write()
            .await
            .insert(collection_id.to_string(), payload.to_string());
    }

    /// Makes every call to `endpoint` answer with `status` and `message`.
    pub async fn fail(&self, endpoint: Endpoint, status: u16, message: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(endpoint, (status, message.into()));
    }

    /// Removes a failure set with [`InMemoryService::fail`].
    pub async fn recover(&self, endpoint: Endpoint) {
        self.failures.write().await.remove(&endpoint);
    }

    /// Returns every request received since creation or the last
    /// [`InMemoryService::clear_requests`], oldest first.
    ///
    /// The log is unbounded. Long-running development servers should clear it periodically.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Empties the request log, returning how many entries it held.
    pub async fn clear_requests(&self) -> usize {
        let mut requests = self.requests.write().await;
        let count = requests.len();
        requests.clear();
        count
    }

    async fn respond<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: Value,
        key: &str,
        ctx: &RequestContext,
    ) -> FacadeResult<T> {
        self.requests.write().await.push(RecordedRequest {
            endpoint,
            body,
            token: ctx.credential().cloned(),
        });

        let (status, payload) = self.answer(endpoint, key, ctx).await;
        tracing::debug!(%endpoint, key, status, "simulated document service answered");

        decode_response(endpoint, status, payload.as_bytes())
    }

    async fn answer(&self, endpoint: Endpoint, key: &str, ctx: &RequestContext) -> (u16, String) {
        if let Some(required) = &self.required_token {
            if ctx.credential() != Some(required) {
                return (401, "invalid or missing token".to_string());
            }
        }

        if let Some((status, message)) = self.failures.read().await.get(&endpoint) {
            return (*status, message.clone());
        }

        let payloads = match endpoint {
            Endpoint::FetchPage => &self.pages,
            Endpoint::FetchCollection => &self.collections,
        };

        match payloads.read().await.get(key) {
            Some(payload) => (200, payload.clone()),
            None => (404, format!("`{key}` not found")),
        }
    }
}

#[async_trait]
impl Gateway for InMemoryService {
    async fn fetch_page(&self, query: &PageQuery, ctx: &RequestContext) -> FacadeResult<Page> {
        self.respond(
            Endpoint::FetchPage,
            serde_json::to_value(query)?,
            &query.page_id,
            ctx,
        )
        .await
    }

    async fn fetch_collection(
        &self,
        query: &CollectionQuery,
        ctx: &RequestContext,
    ) -> FacadeResult<Collection> {
        self.respond(
            Endpoint::FetchCollection,
            serde_json::to_value(query)?,
            &query.collection_id,
            ctx,
        )
        .await
    }
}

/// Builder for constructing [`InMemoryService`] instances.
///
/// # Example
///
/// ```ignore
/// use pagegate_memory::InMemoryService;
/// use pagegate_core::gateway::GatewayBuilder;
/// use serde_json::json;
///
/// let service = InMemoryService::builder()
///     .with_page("p1", json!({ "title": "Hello" }))
///     .with_required_token("secret")
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct InMemoryServiceBuilder {
    pages: PayloadMap,
    collections: PayloadMap,
    required_token: Option<Credential>,
}

impl InMemoryServiceBuilder {
    /// Preloads a page payload.
    pub fn with_page(mut self, page_id: &str, payload: Value) -> Self {
        self.pages.insert(page_id.to_string(), payload.to_string());
        self
    }

    /// Preloads a collection payload.
    pub fn with_collection(mut self, collection_id: &str, payload: Value) -> Self {
        self.collections
            .insert(collection_id.to_string(), payload.to_string());
        self
    }

    /// Answers 401 to every caller that does not present exactly this token.
    pub fn with_required_token(mut self, token: impl Into<Credential>) -> Self {
        self.required_token = Some(token.into());
        self
    }
}

#[async_trait]
impl GatewayBuilder for InMemoryServiceBuilder {
    type Gateway = InMemoryService;

    /// Builds the service. This always succeeds.
    async fn build(self) -> FacadeResult<Self::Gateway> {
        Ok(InMemoryService {
            pages: Arc::new(RwLock::new(self.pages)),
            collections: Arc::new(RwLock::new(self.collections)),
            required_token: self.required_token,
            ..Default::default()
        })
    }
}
