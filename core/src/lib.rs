//! Domain types for the todo service.

pub mod error;
pub mod types;

pub use error::TodoError;
pub use types::{DeletedTodo, FieldError, Todo, TodoInput};
