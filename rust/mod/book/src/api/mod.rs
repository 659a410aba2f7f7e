mod books;
mod token;

use std::sync::Arc;

use axum::Router;

use crate::service::BookService;
use crate::token::{ClaimsExtractor, TokenAuthority};

/// Shared state handed to every book handler.
pub struct ApiState {
    pub service: Arc<BookService>,
    pub extractor: Arc<dyn ClaimsExtractor>,
    pub tokens: Arc<TokenAuthority>,
}

pub type AppState = Arc<ApiState>;

/// Build the book API router. Routes live under `/api/v1`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(books::routes())
        .merge(token::routes());

    Router::new().nest("/api/v1", api).with_state(state)
}
