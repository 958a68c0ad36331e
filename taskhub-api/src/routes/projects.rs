/// Project endpoints
///
/// All routes require authentication. Only the creator may edit or delete;
/// collaborators may read.

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
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
    models::project::{Project, ProjectDetail, UpdateProject},
    services::projects::{self, ProjectInput},
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    /// Defaults to now
    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 200, message = "Client must be 1-200 characters"))]
    pub client: String,
}

/// Update project request; absent fields are left unchanged
///
/// Field lengths are checked by the project service once the project is
/// found and the caller is known to be its creator.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub client: Option<String>,
}

/// List projects the caller created or collaborates on
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = projects::list_projects(state.store.as_ref(), auth.user_id).await?;

    Ok(Json(projects))
}

/// Create a project owned by the caller
///
/// # Endpoint
///
/// ```text
/// POST /v1/projects
///
/// { "name": "Website", "client": "ACME", "description": "", "due_date": "2026-12-01T00:00:00Z" }
/// ```
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppJson(req): AppJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    validate_request(&req)?;

    let project = projects::create_project(
        state.store.as_ref(),
        auth.user_id,
        ProjectInput {
            name: req.name,
            description: req.description,
            due_date: req.due_date,
            client: req.client,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Project with collaborator profiles and task records
///
/// # Errors
///
/// - `404 Not Found`: no such project
/// - `403 Forbidden`: caller is neither creator nor collaborator
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ProjectDetail>> {
    let detail = projects::get_project(state.store.as_ref(), auth.user_id, id).await?;

    Ok(Json(detail))
}

/// Update project metadata; creator only
///
/// # Errors
///
/// - `404 Not Found`: no such project
/// - `403 Forbidden`: caller is not the creator
/// - `400 Bad Request`: a field is too long
pub async fn edit_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let patch = UpdateProject {
        name: req.name,
        description: req.description,
        due_date: req.due_date,
        client: req.client,
    };

    let project = projects::edit_project(state.store.as_ref(), auth.user_id, id, patch).await?;

    Ok(Json(project))
}

/// Delete a project and its tasks; creator only
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<StatusCode> {
    projects::delete_project(state.store.as_ref(), auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
