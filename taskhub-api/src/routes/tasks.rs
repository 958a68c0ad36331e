/// Task endpoints
///
/// Permissions follow the owning project: the creator manages tasks,
/// collaborators may read them and toggle their state.

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{AppJson, AppPath},
};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskhub_shared::{
    auth::middleware::AuthContext,
    models::task::{Task, TaskPriority, UpdateTask},
    services::tasks::{self, TaskInput},
};
use uuid::Uuid;

/// Create task request
///
/// Name and description rules are applied by the task service after the
/// project lookup and the creator check.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub due_date: Option<DateTime<Utc>>,

    /// Defaults to medium
    pub priority: Option<TaskPriority>,

    /// Owning project
    pub project: Uuid,
}

/// Update task request
///
/// There is no `state` field; use `POST /v1/tasks/:id/state`.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,

    pub priority: Option<TaskPriority>,
}

/// Create a task in a project; project creator only
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(req): AppJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = tasks::create_task(
        state.store.as_ref(),
        auth.user_id,
        TaskInput {
            name: req.name,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
            project: req.project,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Read a task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = tasks::get_task(state.store.as_ref(), auth.user_id, id).await?;

    Ok(Json(task))
}

/// Update task metadata; project creator only
pub async fn edit_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let patch = UpdateTask {
        name: req.name,
        description: req.description,
        due_date: req.due_date,
        priority: req.priority,
    };

    let task = tasks::edit_task(state.store.as_ref(), auth.user_id, id, patch).await?;

    Ok(Json(task))
}

/// Delete a task; project creator only
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<StatusCode> {
    tasks::delete_task(state.store.as_ref(), auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Flip the completion state and record the caller as `completed_by`
pub async fn toggle_task_state(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = tasks::toggle_task_state(state.store.as_ref(), auth.user_id, id).await?;

    Ok(Json(task))
}
