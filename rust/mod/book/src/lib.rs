//! Book module: authorization-gated CRUD over a book store.
//!
//! # Pipeline
//!
//! Each mutating request runs the same fixed sequence:
//!
//! 1. decode claims from the bearer token ([`token`])
//! 2. decode the request body
//! 3. authorize the action ([`guard`])
//! 4. validate the payload ([`validate`])
//! 5. apply it to the store ([`store`])
//!
//! and the outcome is shaped into a uniform envelope ([`envelope`]).
//! Reads skip steps 1, 3 and 4.
//!
//! # Usage
//!
//! ```ignore
//! use book::{BookModule, store::SqlBookStore, token::TokenAuthority};
//!
//! let store = Arc::new(SqlBookStore::new(sql)?);
//! let tokens = TokenAuthority::new(&secret, chrono::Duration::minutes(15));
//! let router = BookModule::new(store, tokens).routes();
//! ```

pub mod api;
pub mod envelope;
pub mod guard;
pub mod model;
pub mod service;
pub mod store;
pub mod token;
pub mod validate;

use std::sync::Arc;

use axum::Router;

use bookshelf_core::Module;

use crate::api::ApiState;
use crate::service::BookService;
use crate::store::BookStore;
use crate::token::{ClaimsExtractor, TokenAuthority};

/// Book module implementing the Module trait.
pub struct BookModule {
    state: Arc<ApiState>,
}

impl BookModule {
    /// Build the module; the token authority also serves as claims extractor.
    pub fn new(store: Arc<dyn BookStore>, tokens: TokenAuthority) -> Self {
        let tokens = Arc::new(tokens);
        Self::with_extractor(store, tokens.clone(), tokens)
    }

    /// Build the module with a separate claims extractor.
    pub fn with_extractor(
        store: Arc<dyn BookStore>,
        tokens: Arc<TokenAuthority>,
        extractor: Arc<dyn ClaimsExtractor>,
    ) -> Self {
        let state = Arc::new(ApiState {
            service: BookService::new(store),
            extractor,
            tokens,
        });
        Self { state }
    }
}

impl Module for BookModule {
    fn name(&self) -> &str {
        "book"
    }

    fn routes(&self) -> Router {
        api::build_router(self.state.clone())
    }
}
