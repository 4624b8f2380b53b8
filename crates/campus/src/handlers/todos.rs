//! To-do board handlers. Every route is scoped to the authenticated user.

use axum::{extract::State, http::StatusCode, Json};
use campus_auth::CurrentUser;
use campus_core::school::{validate_todo, CreateTodoRequest, TodoBoard, TodoIdRequest, TodoTask};

use crate::handlers::AppError;
use crate::state::AppState;

/// Get the current user's board (GET /to-do/info).
#[axum::debug_handler]
pub async fn get_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TodoBoard>, AppError> {
    let board = state.todos.get_board(user.id).await?;
    Ok(Json(board))
}

/// Create a task (POST /to-do/create).
#[axum::debug_handler]
pub async fn create_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoTask>), AppError> {
    validate_todo(&req)?;

    let task = state.todos.create_todo(&req.into_new_todo(user.id)).await?;
    tracing::debug!(user_id = user.id, todo_id = task.id, "Created to-do");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Mark a task done (POST /to-do/finish).
#[axum::debug_handler]
pub async fn finish_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<TodoIdRequest>,
) -> Result<StatusCode, AppError> {
    state.todos.finish_todo(user.id, req.todo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a task (POST /to-do/delete).
#[axum::debug_handler]
pub async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<TodoIdRequest>,
) -> Result<StatusCode, AppError> {
    state.todos.delete_todo(user.id, req.todo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
