use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use todo_core::TodoError;

/// Application-level error type for HTTP handlers.
///
/// Every error renders as `{"detail": ...}`: a list of field errors for
/// 422, a message string otherwise.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    /// Any storage failure. Not distinguished further.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The body could not be read (too large, or the stream broke).
    #[error("Unreadable body: {0}")]
    Body(#[from] BytesRejection),

    /// A handler asked for a path parameter its route does not declare.
    #[error("Path extraction failed: {0}")]
    Path(#[from] PathRejection),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Todo(err @ TodoError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, json!(err.to_string()))
            }
            AppError::Todo(TodoError::Validation(errors)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!(errors))
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Internal Server Error"),
                )
            }
            AppError::Body(rejection) => (rejection.status(), json!(rejection.body_text())),
            AppError::Path(rejection) => {
                tracing::error!(error = %rejection, "Path extraction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Internal Server Error"),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
