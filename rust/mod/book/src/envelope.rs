//! Response shaping.
//!
//! Every book endpoint answers with the same envelope:
//!
//! ```json
//! {"failed": false, "message": null, "book": {...}}
//! ```
//!
//! `failed` and `message` are always present. The remaining keys depend on
//! the endpoint and on the outcome; the functions here encode that table and
//! nothing else. They perform no I/O.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use bookshelf_core::StatusCategory;

use crate::model::Book;
use crate::service::BookError;
use crate::validate::ValidationErrors;

pub const PERMISSION_DENIED: &str =
    "permission denied, check credentials or expiration time of your token";
pub const BOOK_NOT_FOUND: &str = "book not found";
pub const BOOK_ID_NOT_FOUND: &str = "book with the given ID is not found";
pub const BOOKS_NOT_FOUND: &str = "books were not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Violations(ValidationErrors),
}

/// Endpoint-specific keys flattened next to `failed` and `message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Bare {},
    Book { book: Option<Book> },
    Books { count: usize, books: Option<Vec<Book>> },
    Token { access_token: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub failed: bool,
    pub message: Option<Message>,
    #[serde(flatten)]
    pub payload: Payload,
}

/// A shaped response: status category plus envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub category: StatusCategory,
    pub envelope: Envelope,
}

impl Reply {
    /// `failed` follows the category, so a shaper cannot report a 2xx failure.
    fn shaped(category: StatusCategory, message: Option<Message>, payload: Payload) -> Self {
        Self {
            category,
            envelope: Envelope {
                failed: category.is_failure(),
                message,
                payload,
            },
        }
    }

    pub fn success(category: StatusCategory, payload: Payload) -> Self {
        Self::shaped(category, None, payload)
    }

    fn failure(category: StatusCategory, message: Message, payload: Payload) -> Self {
        Self::shaped(category, Some(message), payload)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.category.status_code(), Json(self.envelope)).into_response()
    }
}

/// Category and message for an error; `not_found` is the endpoint's text.
fn classify(err: BookError, not_found: &str) -> (StatusCategory, Message) {
    match err {
        BookError::Decode(m) | BookError::Storage(m) => {
            (StatusCategory::ServerError, Message::Text(m))
        }
        BookError::Validation(v) => (StatusCategory::ServerError, Message::Violations(v)),
        BookError::AccessDenied => (
            StatusCategory::Forbidden,
            Message::Text(PERMISSION_DENIED.to_string()),
        ),
        BookError::NotFound => (StatusCategory::NotFound, Message::Text(not_found.to_string())),
    }
}

/// `GET /books`. Any failure reads as "no books".
pub fn list_books(result: Result<Vec<Book>, BookError>) -> Reply {
    match result {
        Ok(books) => Reply::success(
            StatusCategory::Ok,
            Payload::Books {
                count: books.len(),
                books: Some(books),
            },
        ),
        Err(_) => Reply::failure(
            StatusCategory::NotFound,
            Message::Text(BOOKS_NOT_FOUND.to_string()),
            Payload::Books {
                count: 0,
                books: None,
            },
        ),
    }
}

/// `GET /book/{id}`.
pub fn get_book(result: Result<Book, BookError>) -> Reply {
    match result {
        Ok(book) => Reply::success(StatusCategory::Ok, Payload::Book { book: Some(book) }),
        Err(err) => {
            let payload = match err {
                BookError::NotFound => Payload::Book { book: None },
                _ => Payload::Bare {},
            };
            let (category, message) = classify(err, BOOK_ID_NOT_FOUND);
            Reply::failure(category, message, payload)
        }
    }
}

/// `POST /book`.
pub fn create_book(result: Result<Book, BookError>) -> Reply {
    match result {
        Ok(book) => Reply::success(StatusCategory::Created, Payload::Book { book: Some(book) }),
        Err(err) => mutation_failure(err),
    }
}

/// `PATCH /book`.
pub fn update_book(result: Result<Book, BookError>) -> Reply {
    match result {
        Ok(book) => Reply::success(StatusCategory::Accepted, Payload::Book { book: Some(book) }),
        Err(err) => mutation_failure(err),
    }
}

/// `DELETE /book`.
pub fn delete_book(result: Result<(), BookError>) -> Reply {
    match result {
        Ok(()) => Reply::success(StatusCategory::Ok, Payload::Bare {}),
        Err(err) => {
            let (category, message) = classify(err, BOOK_NOT_FOUND);
            Reply::failure(category, message, Payload::Bare {})
        }
    }
}

// Create and update answer a denial with an explicit `book: null`.
fn mutation_failure(err: BookError) -> Reply {
    let payload = match err {
        BookError::AccessDenied => Payload::Book { book: None },
        _ => Payload::Bare {},
    };
    let (category, message) = classify(err, BOOK_NOT_FOUND);
    Reply::failure(category, message, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateBook;
    use serde_json::json;

    fn sample() -> Book {
        Book::new(
            CreateBook {
                title: "A".into(),
                author: "B".into(),
                attrs: Default::default(),
            },
            chrono::Utc::now(),
        )
    }

    fn body(reply: &Reply) -> serde_json::Value {
        serde_json::to_value(&reply.envelope).unwrap()
    }

    #[test]
    fn create_success() {
        let book = sample();
        let reply = create_book(Ok(book.clone()));
        assert_eq!(reply.category, StatusCategory::Created);
        let v = body(&reply);
        assert_eq!(v["failed"], false);
        assert!(v["message"].is_null());
        assert_eq!(v["book"]["id"], json!(book.id));
        assert_eq!(v["book"]["status"], 1);
        assert!(v["book"]["updated_at"].is_null());
    }

    #[test]
    fn create_denied_has_null_book() {
        let reply = create_book(Err(BookError::AccessDenied));
        assert_eq!(reply.category, StatusCategory::Forbidden);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": PERMISSION_DENIED, "book": null})
        );
    }

    #[test]
    fn decode_error_is_server_fault_verbatim() {
        let reply = create_book(Err(BookError::Decode("EOF while parsing".into())));
        assert_eq!(reply.category, StatusCategory::ServerError);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": "EOF while parsing"})
        );
    }

    #[test]
    fn validation_lists_fields() {
        let mut v = ValidationErrors::new();
        v.insert("title".into(), "is required".into());
        let reply = update_book(Err(BookError::Validation(v)));
        assert_eq!(reply.category, StatusCategory::ServerError);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": {"title": "is required"}})
        );
    }

    #[test]
    fn update_not_found_has_no_book_key() {
        let reply = update_book(Err(BookError::NotFound));
        assert_eq!(reply.category, StatusCategory::NotFound);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": "book not found"})
        );
    }

    #[test]
    fn update_success_is_accepted() {
        assert_eq!(update_book(Ok(sample())).category, StatusCategory::Accepted);
    }

    #[test]
    fn get_not_found_has_null_book() {
        let reply = get_book(Err(BookError::NotFound));
        assert_eq!(reply.category, StatusCategory::NotFound);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": BOOK_ID_NOT_FOUND, "book": null})
        );
    }

    #[test]
    fn get_decode_error_is_bare() {
        let reply = get_book(Err(BookError::Decode("invalid length".into())));
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": "invalid length"})
        );
    }

    #[test]
    fn list_shapes() {
        let reply = list_books(Err(BookError::NotFound));
        assert_eq!(reply.category, StatusCategory::NotFound);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": BOOKS_NOT_FOUND, "count": 0, "books": null})
        );

        let reply = list_books(Ok(vec![sample(), sample()]));
        let v = body(&reply);
        assert_eq!(reply.category, StatusCategory::Ok);
        assert_eq!(v["count"], 2);
        assert_eq!(v["books"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn delete_shapes() {
        let reply = delete_book(Ok(()));
        assert_eq!(reply.category, StatusCategory::Ok);
        assert_eq!(body(&reply), json!({"failed": false, "message": null}));

        let reply = delete_book(Err(BookError::AccessDenied));
        assert_eq!(reply.category, StatusCategory::Forbidden);
        assert_eq!(
            body(&reply),
            json!({"failed": true, "message": PERMISSION_DENIED})
        );

        let reply = delete_book(Err(BookError::Storage("disk full".into())));
        assert_eq!(reply.category, StatusCategory::ServerError);
    }

    #[test]
    fn shaping_is_pure() {
        assert_eq!(
            delete_book(Err(BookError::NotFound)),
            delete_book(Err(BookError::NotFound))
        );
    }
}
