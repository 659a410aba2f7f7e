use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::Router;

use crate::api::AppState;
use crate::envelope::{self, Reply};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/book/{id}", get(get_book))
        .route(
            "/book",
            post(create_book).patch(update_book).delete(delete_book),
        )
}

async fn list_books(State(state): State<AppState>) -> Reply {
    envelope::list_books(state.service.list_books())
}

async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    envelope::get_book(state.service.get_book(&id))
}

async fn create_book(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Reply {
    let result = state
        .extractor
        .extract(&headers)
        .and_then(|claims| state.service.create_book(&claims, &body));
    envelope::create_book(result)
}

async fn update_book(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Reply {
    let result = state
        .extractor
        .extract(&headers)
        .and_then(|claims| state.service.update_book(&claims, &body));
    envelope::update_book(result)
}

async fn delete_book(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Reply {
    let result = state
        .extractor
        .extract(&headers)
        .and_then(|claims| state.service.delete_book(&claims, &body));
    envelope::delete_book(result)
}
