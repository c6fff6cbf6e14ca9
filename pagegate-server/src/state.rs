//! Shared application state

use std::sync::Arc;

use pagegate_core::facade::DynQueryFacade;

/// State handed to every request handler.
///
/// The facade is request-agnostic; each handler builds its own `RequestContext`.
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<DynQueryFacade>,
}

impl AppState {
    pub fn new(facade: DynQueryFacade) -> Self {
        Self {
            facade: Arc::new(facade),
        }
    }
}
