use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// ── Status categories ───────────────────────────────────────────────
//
// Every endpoint answers with one of these. The HTTP status is derived
// from the category, never chosen ad hoc by a handler.

/// Coarse outcome class of a request, mapped 1:1 to an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Ok,
    Created,
    Accepted,
    Forbidden,
    NotFound,
    ServerError,
}

impl StatusCategory {
    /// HTTP status code for this category.
    pub fn status_code(self) -> StatusCode {
        match self {
            StatusCategory::Ok => StatusCode::OK,
            StatusCategory::Created => StatusCode::CREATED,
            StatusCategory::Accepted => StatusCode::ACCEPTED,
            StatusCategory::Forbidden => StatusCode::FORBIDDEN,
            StatusCategory::NotFound => StatusCode::NOT_FOUND,
            StatusCategory::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the category reports a failed request.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            StatusCategory::Forbidden | StatusCategory::NotFound | StatusCategory::ServerError
        )
    }
}

// ── ServiceError ────────────────────────────────────────────────────

/// Service-level error shared by modules and the server binary.
///
/// Used by endpoints outside the book pipeline, such as token issuing.
/// The JSON body uses the same envelope keys as book responses:
///
/// ```json
/// {"failed": true, "message": "signing key rejected"}
/// ```
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn category(&self) -> StatusCategory {
        match self {
            ServiceError::Internal(_) => StatusCategory::ServerError,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let category = self.category();
        let body = serde_json::json!({
            "failed": category.is_failure(),
            "message": self.to_string(),
        });
        (category.status_code(), axum::Json(body)).into_response()
    }
}
