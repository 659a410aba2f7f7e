use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tracing::info;

use bookshelf_core::{ServiceError, StatusCategory};

use crate::api::AppState;
use crate::envelope::{Payload, Reply};
use crate::model::Permissions;

pub fn routes() -> Router<AppState> {
    Router::new().route("/token/new", get(new_token))
}

/// Mint a token granting every book action.
async fn new_token(State(state): State<AppState>) -> Result<Reply, ServiceError> {
    let access_token = state.tokens.issue(Permissions::all())?;
    info!("issued access token");
    Ok(Reply::success(
        StatusCategory::Ok,
        Payload::Token { access_token },
    ))
}
