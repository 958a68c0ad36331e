//! Collaborator management.
//!
//! The creator is never a collaborator, and a user appears at most once in a
//! project's collaborator list.

use tracing::info;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::projects::load_project;
use crate::auth::authorization::{require_project_access, ProjectAction};
use crate::models::{project::Project, user::PublicUser};
use crate::store::{Store, StoreError};

const ALREADY_ADMIN: &str = "user is already admin of this project";
const ALREADY_COLLABORATOR: &str = "user is already collaborator on this project";

/// Looks up a user by exact email for the "add collaborator" dialog
pub async fn find_collaborator_candidate(store: &dyn Store, email: &str) -> ServiceResult<PublicUser> {
    store
        .find_user_by_email(email.trim())
        .await?
        .map(PublicUser::from)
        .ok_or_else(|| ServiceError::not_found("user"))
}

/// Adds `candidate` to the project's collaborators
///
/// Checks run in this order, stopping at the first failure:
/// 1. the project exists (`NotFound`)
/// 2. `actor` is its creator (`Authorization`)
/// 3. the candidate exists (`NotFound`)
/// 4. the candidate is not the creator (`InvalidOperation`)
/// 5. the candidate is not already a collaborator (`InvalidOperation`)
pub async fn add_collaborator(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    candidate: Uuid,
) -> ServiceResult<Project> {
    let project = load_project(store, project_id).await?;
    require_project_access(actor, &project, ProjectAction::ManageCollaborators)?;

    let candidate = store
        .find_user_by_id(candidate)
        .await?
        .ok_or_else(|| ServiceError::not_found("user"))?;

    if candidate.id == project.creator {
        return Err(ServiceError::InvalidOperation(ALREADY_ADMIN.to_string()));
    }
    if project.has_collaborator(candidate.id) {
        return Err(ServiceError::InvalidOperation(
            ALREADY_COLLABORATOR.to_string(),
        ));
    }

    let project = store
        .add_collaborator(project.id, candidate.id)
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                ServiceError::InvalidOperation(ALREADY_COLLABORATOR.to_string())
            }
            other => other.into(),
        })?;

    info!(project_id = %project.id, user_id = %candidate.id, "Collaborator added");
    Ok(project)
}

/// Removes `target` from the project's collaborators; creator only
///
/// Removing someone who is not a collaborator succeeds without changes.
pub async fn remove_collaborator(
    store: &dyn Store,
    actor: Uuid,
    project_id: Uuid,
    target: Uuid,
) -> ServiceResult<Project> {
    let project = load_project(store, project_id).await?;
    require_project_access(actor, &project, ProjectAction::ManageCollaborators)?;

    if !project.has_collaborator(target) {
        return Ok(project);
    }

    let project = store.remove_collaborator(project.id, target).await?;

    info!(project_id = %project.id, user_id = %target, "Collaborator removed");
    Ok(project)
}
