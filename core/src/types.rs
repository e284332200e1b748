//! Request and response shapes for the todo API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TodoError;

/// A persisted todo item as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub is_important: bool,
}

/// Payload for creating a todo or replacing an existing one's fields.
///
/// Updates always overwrite both fields; an omitted `is_important` resets
/// the flag to `false`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub is_important: bool,
}

impl TodoInput {
    /// Validate a JSON request body and build the input shape from it.
    ///
    /// Unknown fields are ignored. Every invalid field contributes one
    /// [`FieldError`] to the returned [`TodoError::Validation`].
    pub fn from_json(value: &Value) -> Result<Self, TodoError> {
        let Some(fields) = value.as_object() else {
            return Err(TodoError::Validation(vec![FieldError::body_not_object()]));
        };

        let mut errors = Vec::new();

        let title = match fields.get("title") {
            Some(Value::String(title)) => Some(title.clone()),
            Some(_) => {
                errors.push(FieldError::body(
                    "title",
                    "Input should be a valid string",
                    "string_type",
                ));
                None
            }
            None => {
                errors.push(FieldError::body("title", "Field required", "missing"));
                None
            }
        };

        let is_important = match fields.get("is_important") {
            Some(value) => match coerce_bool(value) {
                Some(flag) => flag,
                None => {
                    errors.push(FieldError::body(
                        "is_important",
                        "Input should be a valid boolean",
                        "bool_type",
                    ));
                    false
                }
            },
            None => false,
        };

        match title {
            Some(title) if errors.is_empty() => Ok(Self {
                title,
                is_important,
            }),
            _ => Err(TodoError::Validation(errors)),
        }
    }
}

/// Read a boolean the way lenient JSON clients send one: `true`/`false`,
/// `0`/`1`, or a recognised word such as `"yes"` or `"off"`.
fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "1" | "on" | "t" | "true" | "y" | "yes" => Some(true),
            "0" | "off" | "f" | "false" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// One field-level validation failure.
///
/// `loc` is the path to the offending value, starting with where it came
/// from (`body` or `path`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(loc: Vec<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Error located at a top-level field of the request body.
    pub fn body(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(vec!["body".to_string(), field.to_string()], msg, kind)
    }

    /// The body as a whole is not a JSON object.
    pub fn body_not_object() -> Self {
        Self::new(
            vec!["body".to_string()],
            "Input should be a valid dictionary or object to extract fields from",
            "model_attributes_type",
        )
    }

    /// The request carried no body at all.
    pub fn body_missing() -> Self {
        Self::new(vec!["body".to_string()], "Field required", "missing")
    }
}

/// Confirmation returned after a todo is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedTodo {
    pub message: String,
}

impl DeletedTodo {
    pub fn for_id(id: i64) -> Self {
        Self {
            message: format!("Todo with id {id} has been deleted"),
        }
    }
}
