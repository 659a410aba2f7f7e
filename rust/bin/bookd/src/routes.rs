//! Route registration: collects module routes + system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use bookshelf_core::Module;

/// Build the complete router with all routes.
pub fn build_router(modules: &[&dyn Module]) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for module in modules {
        app = app.merge(module.routes());
    }
    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "bookd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
