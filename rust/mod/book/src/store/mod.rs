//! Persistence gateway for books.
//!
//! [`BookStore`] is the only way the service touches durable state. Each
//! method is one round trip; no method composes with another into a
//! transaction.

mod kv;
mod sql;

pub use kv::KvBookStore;
pub use sql::SqlBookStore;

use thiserror::Error;
use uuid::Uuid;

use crate::model::Book;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    Storage(String),
}

impl StoreError {
    pub(crate) fn storage(e: impl std::fmt::Display) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// Durable store of books keyed by id.
pub trait BookStore: Send + Sync {
    /// All books, oldest first.
    fn get_books(&self) -> Result<Vec<Book>, StoreError>;

    fn get_book(&self, id: &Uuid) -> Result<Book, StoreError>;

    fn create_book(&self, book: &Book) -> Result<(), StoreError>;

    /// Overwrite an existing book. `NotFound` if the id is absent.
    fn update_book(&self, book: &Book) -> Result<(), StoreError>;

    /// `NotFound` if the id is absent.
    fn delete_book(&self, id: &Uuid) -> Result<(), StoreError>;
}
