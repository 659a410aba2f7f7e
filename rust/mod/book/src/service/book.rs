use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::guard;
use crate::model::{Action, Book, Claims, CreateBook, DeleteBook, UpdateBook};
use crate::service::{BookError, BookService};
use crate::store::StoreError;
use crate::validate::Validate;

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, BookError> {
    serde_json::from_slice(body).map_err(|e| BookError::Decode(e.to_string()))
}

fn require(claims: &Claims, action: Action) -> Result<(), BookError> {
    if guard::authorize_now(claims, action) {
        Ok(())
    } else {
        warn!(%action, "permission denied");
        Err(BookError::AccessDenied)
    }
}

impl BookService {
    /// Existence lookup. Every failure reads as `NotFound`; storage faults
    /// are still logged.
    fn lookup(&self, id: &Uuid) -> Result<Book, BookError> {
        self.store.get_book(id).map_err(|e| {
            if let StoreError::Storage(_) = e {
                warn!(%id, error = %e, "book lookup failed");
            }
            BookError::NotFound
        })
    }

    /// All books. An empty store and a failed query both come back as
    /// `NotFound`.
    pub fn list_books(&self) -> Result<Vec<Book>, BookError> {
        match self.store.get_books() {
            Ok(books) if books.is_empty() => Err(BookError::NotFound),
            Ok(books) => Ok(books),
            Err(e) => {
                warn!(error = %e, "listing books failed");
                Err(BookError::NotFound)
            }
        }
    }

    /// One book by its textual id.
    pub fn get_book(&self, id: &str) -> Result<Book, BookError> {
        let id = Uuid::parse_str(id).map_err(|e| BookError::Decode(e.to_string()))?;
        let book = self.lookup(&id)?;
        debug!(%id, "fetched book");
        Ok(book)
    }

    /// Decode → guard → validate → populate → persist.
    pub fn create_book(&self, claims: &Claims, body: &[u8]) -> Result<Book, BookError> {
        let input: CreateBook = decode(body)?;
        require(claims, Action::BookCreate)?;
        input.validate().map_err(BookError::Validation)?;

        let book = Book::new(input, Utc::now());
        self.store.create_book(&book).map_err(|e| {
            warn!(id = %book.id, error = %e, "storing new book failed");
            BookError::Storage(e.to_string())
        })?;

        info!(id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Decode → guard → validate → existence check → persist.
    ///
    /// The existence check and the write are separate store calls; a delete
    /// landing between them surfaces as `NotFound` from the write.
    pub fn update_book(&self, claims: &Claims, body: &[u8]) -> Result<Book, BookError> {
        let input: UpdateBook = decode(body)?;
        require(claims, Action::BookUpdate)?;
        input.validate().map_err(BookError::Validation)?;

        let current = self.lookup(&input.id)?;
        let book = current.apply(input, Utc::now());
        self.store.update_book(&book).map_err(|e| {
            warn!(id = %book.id, error = %e, "storing updated book failed");
            BookError::from(e)
        })?;

        info!(id = %book.id, "book updated");
        Ok(book)
    }

    /// Decode → guard → existence check → delete.
    pub fn delete_book(&self, claims: &Claims, body: &[u8]) -> Result<(), BookError> {
        let input: DeleteBook = decode(body)?;
        require(claims, Action::BookDelete)?;

        self.lookup(&input.id)?;
        self.store.delete_book(&input.id).map_err(|e| {
            warn!(id = %input.id, error = %e, "deleting book failed");
            BookError::from(e)
        })?;

        info!(id = %input.id, "book deleted");
        Ok(())
    }
}
