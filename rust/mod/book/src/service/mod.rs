mod book;

use std::sync::Arc;

use thiserror::Error;

use crate::store::{BookStore, StoreError};
use crate::validate::ValidationErrors;

/// Outcome of a failed book request.
///
/// Every variant is terminal for the request; none is retried.
#[derive(Debug, Error)]
pub enum BookError {
    /// Malformed identifier, body or token.
    #[error("{0}")]
    Decode(String),

    /// One or more field constraints violated.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// Missing grant or expired token. The two are never distinguished.
    #[error("access denied")]
    AccessDenied,

    #[error("not found")]
    NotFound,

    /// The persistence gateway itself failed.
    #[error("{0}")]
    Storage(String),
}

impl From<StoreError> for BookError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => BookError::NotFound,
            StoreError::Storage(m) => BookError::Storage(m),
        }
    }
}

/// The mutation orchestrator: one routine per book action.
pub struct BookService {
    pub(crate) store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Arc<Self> {
        Arc::new(Self { store })
    }
}
