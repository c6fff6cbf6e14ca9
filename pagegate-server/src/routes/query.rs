//! The two query endpoints.
//!
//! Both take their arguments as a JSON body and the caller's credential from the `Token`
//! header, and answer with the typed result serialized back to JSON.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use pagegate_core::{
    context::{Credential, RequestContext, TOKEN_HEADER},
    model::{Collection, Page},
    query::{CollectionQuery, Filter},
};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::{error::Result, state::AppState};

/// Arguments of `fetchPage`. A missing or null `pageId` is left for the facade to reject.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageArgs {
    #[serde(default)]
    pub page_id: Option<String>,
}

/// Arguments of `fetchCollection`.
///
/// Also accepts the older argument names: `collectionView` for the view id, and a single
/// `filter`, which is appended after any `filters`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CollectionArgs {
    #[serde(default)]
    pub collection_id: Option<String>,
    #[serde(default, alias = "collectionView")]
    pub collection_view_id: Option<String>,
    #[serde(default)]
    pub filters: Option<Vec<Filter>>,
    #[serde(default)]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl From<CollectionArgs> for CollectionQuery {
    fn from(args: CollectionArgs) -> Self {
        let mut filters = args.filters;
        if let Some(filter) = args.filter {
            filters.get_or_insert_with(Vec::new).push(filter);
        }

        CollectionQuery {
            collection_id: args.collection_id.unwrap_or_default(),
            collection_view_id: args.collection_view_id.unwrap_or_default(),
            filters,
            cursor: args.cursor,
            limit: args.limit,
        }
    }
}

/// Builds the request context from the inbound headers. The token bytes are kept as sent.
pub fn context_from_headers(headers: &HeaderMap) -> RequestContext {
    RequestContext::new(
        headers
            .get(TOKEN_HEADER)
            .map(|value| Credential::new(value.as_bytes())),
    )
}

pub async fn fetch_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    args: std::result::Result<Json<PageArgs>, JsonRejection>,
) -> Result<Json<Page>> {
    let Json(args) = args?;
    let ctx = context_from_headers(&headers);
    let span = tracing::info_span!("query", request_id = %Uuid::new_v4(), endpoint = "fetchPage");

    let page = state
        .facade
        .fetch_page(&ctx, args.page_id.as_deref().unwrap_or_default())
        .instrument(span)
        .await?;

    Ok(Json(page))
}

pub async fn fetch_collection(
    State(state): State<AppState>,
    headers: HeaderMap,
    args: std::result::Result<Json<CollectionArgs>, JsonRejection>,
) -> Result<Json<Collection>> {
    let Json(args) = args?;
    let ctx = context_from_headers(&headers);
    let span =
        tracing::info_span!("query", request_id = %Uuid::new_v4(), endpoint = "fetchCollection");

    let collection = state
        .facade
        .fetch_collection(&ctx, args.into())
        .instrument(span)
        .await?;

    Ok(Json(collection))
}
