use std::sync::Arc;

use bookshelf_sql::{SQLStore, Value};
use chrono::SecondsFormat;
use uuid::Uuid;

use super::{BookStore, StoreError};
use crate::model::Book;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS books (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        status INTEGER NOT NULL,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_books_created ON books(created_at)",
];

/// Books stored as JSON in the `data` column, with indexed copies of the
/// fields used for lookup and ordering.
pub struct SqlBookStore {
    sql: Arc<dyn SQLStore>,
}

impl SqlBookStore {
    /// Wrap a SQL store, creating the books table if needed.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, StoreError> {
        for stmt in SCHEMA {
            sql.exec(stmt, &[]).map_err(StoreError::storage)?;
        }
        Ok(Self { sql })
    }

    fn decode_rows(rows: &[bookshelf_sql::Row]) -> Result<Vec<Book>, StoreError> {
        rows.iter()
            .map(|row| {
                let data = row
                    .get_str("data")
                    .ok_or_else(|| StoreError::Storage("missing data column".into()))?;
                serde_json::from_str(data).map_err(StoreError::storage)
            })
            .collect()
    }
}

// Fixed-width so that text ordering matches time ordering.
fn timestamp(t: &chrono::DateTime<chrono::Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl BookStore for SqlBookStore {
    fn get_books(&self) -> Result<Vec<Book>, StoreError> {
        let rows = self
            .sql
            .query("SELECT data FROM books ORDER BY created_at ASC, id ASC", &[])
            .map_err(StoreError::storage)?;
        Self::decode_rows(&rows)
    }

    fn get_book(&self, id: &Uuid) -> Result<Book, StoreError> {
        let rows = self
            .sql
            .query(
                "SELECT data FROM books WHERE id = ?1",
                &[Value::from(id.to_string())],
            )
            .map_err(StoreError::storage)?;
        Self::decode_rows(&rows)?
            .pop()
            .ok_or(StoreError::NotFound(*id))
    }

    fn create_book(&self, book: &Book) -> Result<(), StoreError> {
        let data = serde_json::to_string(book).map_err(StoreError::storage)?;
        self.sql
            .exec(
                "INSERT INTO books (id, title, author, status, data, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                &[
                    Value::from(book.id.to_string()),
                    Value::from(book.title.as_str()),
                    Value::from(book.author.as_str()),
                    Value::from(i64::from(u8::from(book.status))),
                    Value::from(data),
                    Value::from(timestamp(&book.created_at)),
                    Value::from(book.updated_at.as_ref().map(timestamp)),
                ],
            )
            .map_err(StoreError::storage)?;
        Ok(())
    }

    fn update_book(&self, book: &Book) -> Result<(), StoreError> {
        let data = serde_json::to_string(book).map_err(StoreError::storage)?;
        let affected = self
            .sql
            .exec(
                "UPDATE books SET title = ?1, author = ?2, status = ?3, data = ?4, updated_at = ?5
                 WHERE id = ?6",
                &[
                    Value::from(book.title.as_str()),
                    Value::from(book.author.as_str()),
                    Value::from(i64::from(u8::from(book.status))),
                    Value::from(data),
                    Value::from(book.updated_at.as_ref().map(timestamp)),
                    Value::from(book.id.to_string()),
                ],
            )
            .map_err(StoreError::storage)?;
        if affected == 0 {
            return Err(StoreError::NotFound(book.id));
        }
        Ok(())
    }

    fn delete_book(&self, id: &Uuid) -> Result<(), StoreError> {
        let affected = self
            .sql
            .exec(
                "DELETE FROM books WHERE id = ?1",
                &[Value::from(id.to_string())],
            )
            .map_err(StoreError::storage)?;
        if affected == 0 {
            return Err(StoreError::NotFound(*id));
        }
        Ok(())
    }
}
