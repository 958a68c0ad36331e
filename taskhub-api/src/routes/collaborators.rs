/// Collaborator endpoints
///
/// - `POST   /v1/collaborators/search` - Look up a user by email
/// - `POST   /v1/projects/:id/collaborators` - Add a collaborator (creator only)
/// - `DELETE /v1/projects/:id/collaborators/:user_id` - Remove a collaborator (creator only)

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{AppJson, AppPath},
};
use axum::{
    extract::State,
    Extension, Json,
};
use serde::Deserialize;
use taskhub_shared::{
    auth::middleware::AuthContext,
    models::{project::Project, user::PublicUser},
    services::collaborators,
};
use uuid::Uuid;
use validator::Validate;

/// Candidate search request
#[derive(Debug, Deserialize, Validate)]
pub struct SearchCollaboratorRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Add collaborator request
#[derive(Debug, Deserialize)]
pub struct AddCollaboratorRequest {
    /// User to add
    pub id: Uuid,
}

/// Find a registered user by email
pub async fn search_collaborator(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    AppJson(req): AppJson<SearchCollaboratorRequest>,
) -> ApiResult<Json<PublicUser>> {
    validate_request(&req)?;

    let user = collaborators::find_collaborator_candidate(state.store.as_ref(), &req.email).await?;

    Ok(Json(user))
}

/// Add a collaborator
///
/// # Errors
///
/// - `404 Not Found`: unknown project or user
/// - `403 Forbidden`: caller is not the creator
/// - `409 Conflict`: user is the creator or already a collaborator
pub async fn add_collaborator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath(project_id): AppPath<Uuid>,
    AppJson(req): AppJson<AddCollaboratorRequest>,
) -> ApiResult<Json<Project>> {
    let project =
        collaborators::add_collaborator(state.store.as_ref(), auth.user_id, project_id, req.id)
            .await?;

    Ok(Json(project))
}

/// Remove a collaborator; removing a non-member is a no-op
pub async fn remove_collaborator(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    AppPath((project_id, user_id)): AppPath<(Uuid, Uuid)>,
) -> ApiResult<Json<Project>> {
    let project =
        collaborators::remove_collaborator(state.store.as_ref(), auth.user_id, project_id, user_id)
            .await?;

    Ok(Json(project))
}
