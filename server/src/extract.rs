//! Extractors that report malformed ids and bodies as 422 field errors.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde_json::Value;
use todo_core::{FieldError, TodoError, TodoInput};

use crate::error::AppError;

/// The integer `{id}` segment of a todo path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoId(pub i64);

impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            // The segment exists but is not valid UTF-8 once decoded.
            Err(PathRejection::FailedToDeserializePathParams(_)) => return Err(invalid_id()),
            // Mounted on a route without an `{id}` segment.
            Err(rejection) => return Err(rejection.into()),
        };

        raw.parse::<i64>().map(TodoId).map_err(|_| invalid_id())
    }
}

fn invalid_id() -> AppError {
    TodoError::Validation(vec![FieldError::new(
        vec!["path".to_string(), "id".to_string()],
        "Input should be a valid integer, unable to parse string as an integer",
        "int_parsing",
    )])
    .into()
}

/// A request body validated into a [`TodoInput`].
///
/// A body without a `Content-Type` is parsed as JSON. Any other non-JSON
/// content type is treated as an opaque value, not an object.
#[derive(Debug, Clone)]
pub struct TodoBody(pub TodoInput);

impl<S> FromRequest<S> for TodoBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parse_as_json = is_json_or_unset(req.headers());
        let bytes = Bytes::from_request(req, state).await?;

        if bytes.is_empty() {
            return Err(TodoError::Validation(vec![FieldError::body_missing()]).into());
        }
        if !parse_as_json {
            return Err(TodoError::Validation(vec![FieldError::body_not_object()]).into());
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|err| {
            TodoError::Validation(vec![FieldError::new(
                vec!["body".to_string()],
                format!("JSON decode error: {err}"),
                "json_invalid",
            )])
        })?;

        Ok(Self(TodoInput::from_json(&value)?))
    }
}

/// `application/json`, any `+json` subtype, or no content type at all.
fn is_json_or_unset(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return true;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
