//! The queries the facade forwards to the document service.
//!
//! Each query type is also the exact JSON body of its outbound request. The facade only
//! checks that required identifiers are present; filter operators, values, cursors and
//! limits are the document service's to interpret and are passed through untouched.
//!
//! # Query Building
//!
//! ```ignore
//! use pagegate_core::query::{CollectionQuery, Filter};
//!
//! let query = CollectionQuery::builder("tasks", "board-view")
//!     .filter(Filter::new("Status", "enum_is", "Done"))
//!     .filter(Filter::new("Due", "date_is_before", 1_700_000_000_000_i64))
//!     .limit("50")
//!     .build();
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FacadeError, FacadeResult};

/// Fetch a single page by id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_id: String,
}

impl PageQuery {
    /// Creates a page query.
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: page_id.into(),
        }
    }

    /// Checks that the page id is present.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Validation`] if `pageId` is empty.
    pub fn validate(&self) -> FacadeResult<()> {
        require("pageId", &self.page_id)
    }
}

/// A filter over a collection.
///
/// `operator` and `value` are not interpreted by the facade.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Filter {
    /// Name of the property the filter applies to.
    pub property: String,
    pub operator: String,
    /// `None` when the key is absent. An explicit `null` is `Some(Value::Null)` and is
    /// forwarded as `null`.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Filter {
    /// Creates a filter comparing `property` against `value` with `operator`.
    pub fn new(
        property: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            property: property.into(),
            operator: operator.into(),
            value: Some(value.into()),
        }
    }

    /// Creates a filter whose operator takes no value (e.g. "is empty").
    pub fn unary(property: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            operator: operator.into(),
            value: None,
        }
    }
}

/// Fetch a filtered view of a collection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    pub collection_id: String,
    pub collection_view_id: String,
    /// Filters, in the order the caller gave them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    /// Opaque pagination cursor from a previous response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl CollectionQuery {
    /// Creates a query for the given collection and view with no filters, cursor or limit.
    pub fn new(collection_id: impl Into<String>, collection_view_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            collection_view_id: collection_view_id.into(),
            filters: None,
            cursor: None,
            limit: None,
        }
    }

    /// Creates a new builder for a collection query.
    pub fn builder(
        collection_id: impl Into<String>,
        collection_view_id: impl Into<String>,
    ) -> CollectionQueryBuilder {
        CollectionQueryBuilder::new(collection_id, collection_view_id)
    }

    /// Checks that the collection and view ids are present.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Validation`] naming the first empty identifier.
    pub fn validate(&self) -> FacadeResult<()> {
        require("collectionId", &self.collection_id)?;
        require("collectionViewId", &self.collection_view_id)
    }
}

/// Builder for constructing [`CollectionQuery`] instances with a fluent API.
pub struct CollectionQueryBuilder {
    query: CollectionQuery,
}

impl CollectionQueryBuilder {
    /// Creates a new builder for the given collection and view.
    pub fn new(collection_id: impl Into<String>, collection_view_id: impl Into<String>) -> Self {
        Self {
            query: CollectionQuery::new(collection_id, collection_view_id),
        }
    }

    /// Appends a filter.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.query.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Appends several filters, keeping their order.
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.query
            .filters
            .get_or_insert_with(Vec::new)
            .extend(filters);
        self
    }

    /// Sets the pagination cursor.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.query.cursor = Some(cursor.into());
        self
    }

    /// Sets the page size limit.
    pub fn limit(mut self, limit: impl Into<String>) -> Self {
        self.query.limit = Some(limit.into());
        self
    }

    /// Builds and returns the final [`CollectionQuery`].
    pub fn build(self) -> CollectionQuery {
        self.query
    }
}

fn require(argument: &str, value: &str) -> FacadeResult<()> {
    if value.is_empty() {
        return Err(FacadeError::missing(argument));
    }

    Ok(())
}
