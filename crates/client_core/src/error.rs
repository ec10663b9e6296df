use reqwest::Method;
use shared::error::FieldError;
use thiserror::Error;

use crate::list_controller::MutationKind;

/// Failure of a single round trip to the product backend.
///
/// Network, authorization and validation failures are not told apart: any
/// non-2xx status is reported the same way.
#[derive(Debug, Error)]
pub enum ApiRequestError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A user action the current edit state does not allow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("no row is being edited")]
    NotEditing,
    #[error("row {row} is being edited, not product {id}")]
    RowMismatch { row: usize, id: String },
    #[error("row {row} does not exist ({len} rows loaded)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("the add product panel is closed")]
    PanelClosed,
    #[error("{0} is already in flight")]
    InFlight(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to load products: {0}")]
    Load(#[source] ApiRequestError),
    #[error("product was {} but reloading the list failed: {source}", .kind.past_tense())]
    Reload {
        kind: MutationKind,
        #[source]
        source: ApiRequestError,
    },
    #[error("failed to {} product: {source}", .kind.verb())]
    Mutation {
        kind: MutationKind,
        #[source]
        source: ApiRequestError,
    },
    #[error(transparent)]
    Editor(#[from] EditorError),
}
