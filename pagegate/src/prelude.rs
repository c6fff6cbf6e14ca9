//! Convenient re-exports of commonly used types from pagegate.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use pagegate::prelude::*;
//! ```
//!
//! This provides access to:
//! - The document model and block content variants
//! - Queries and filters
//! - The request context and credentials
//! - Gateway traits and the query facade
//! - Error types

pub use pagegate_core::{
    content::{ContentType, ResolveError},
    context::{Credential, RequestContext, TOKEN_HEADER},
    error::{ErrorKind, FacadeError, FacadeResult},
    facade::{DynQueryFacade, QueryFacade},
    gateway::{DynGateway, Endpoint, Gateway, GatewayBuilder},
    model::{
        Block, BlockContent, CalloutBlockContent, Collection, Format, Metadata, Page, Property,
        SectionBlockContent, TextBlockContent, TextBlockItem, TextItemsBlockContent,
        TodoBlockContent,
    },
    query::{CollectionQuery, CollectionQueryBuilder, Filter, PageQuery},
};
