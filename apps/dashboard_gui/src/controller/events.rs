//! Events sent from the backend worker back to the UI thread.

use client_core::ApiRequestError;
use shared::domain::{Product, ProductId};

pub type ListResult = Result<Vec<Product>, ApiRequestError>;

pub enum UiEvent {
    Info(String),
    BackendUnavailable(String),
    ProductsLoaded(ListResult),
    /// `reload` is only present when the mutation itself succeeded.
    ProductCreated {
        result: Result<Product, ApiRequestError>,
        reload: Option<ListResult>,
    },
    ProductUpdated {
        id: ProductId,
        result: Result<(), ApiRequestError>,
        reload: Option<ListResult>,
    },
    ProductDeleted {
        id: ProductId,
        result: Result<(), ApiRequestError>,
        reload: Option<ListResult>,
    },
}
