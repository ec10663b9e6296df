use thiserror::Error;

use crate::domain::ProductField;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("{field} expects a number, got {raw:?}")]
    NotANumber { field: ProductField, raw: String },
    #[error("{field} expects text, got a number")]
    ExpectedText { field: ProductField },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product field '{0}'")]
pub struct UnknownField(pub String);
