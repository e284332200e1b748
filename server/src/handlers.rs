//! Handlers for the `/todos` resource.

use axum::Json;
use todo_core::{DeletedTodo, Todo, TodoError};

use crate::db::TodoRepo;
use crate::error::AppResult;
use crate::extract::{TodoBody, TodoId};
use crate::session::DbSession;

/// GET /todos/
pub async fn list_todos(mut session: DbSession) -> AppResult<Json<Vec<Todo>>> {
    let todos = TodoRepo::list_all(&mut session).await?;
    Ok(Json(todos))
}

/// GET /todos/{id}/
pub async fn get_todo(mut session: DbSession, TodoId(id): TodoId) -> AppResult<Json<Todo>> {
    let todo = TodoRepo::find_by_id(&mut session, id)
        .await?
        .ok_or(TodoError::NotFound { id })?;
    Ok(Json(todo))
}

/// POST /todos/
///
/// Answers 200 with the stored row, including its new id.
pub async fn create_todo(
    mut session: DbSession,
    TodoBody(input): TodoBody,
) -> AppResult<Json<Todo>> {
    let todo = TodoRepo::create(&mut session, &input).await?;
    tracing::info!(todo_id = todo.id, "Todo created");
    Ok(Json(todo))
}

/// PUT /todos/{id}/
///
/// Replaces both `title` and `is_important`.
pub async fn update_todo(
    mut session: DbSession,
    TodoId(id): TodoId,
    TodoBody(input): TodoBody,
) -> AppResult<Json<Todo>> {
    let todo = TodoRepo::update(&mut session, id, &input)
        .await?
        .ok_or(TodoError::NotFound { id })?;
    tracing::info!(todo_id = id, "Todo updated");
    Ok(Json(todo))
}

/// DELETE /todos/{id}/
pub async fn delete_todo(
    mut session: DbSession,
    TodoId(id): TodoId,
) -> AppResult<Json<DeletedTodo>> {
    if !TodoRepo::delete(&mut session, id).await? {
        return Err(TodoError::NotFound { id }.into());
    }
    tracing::info!(todo_id = id, "Todo deleted");
    Ok(Json(DeletedTodo::for_id(id)))
}
