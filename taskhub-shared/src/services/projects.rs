//! Project operations.
//!
//! Each mutation loads the project, asks the authorization engine, then
//! writes. Nothing is written when a check fails.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::fields::{
    bounded, bounded_opt, required, CLIENT_MAX_CHARS, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
use crate::auth::authorization::{require_project_access, ProjectAction};
use crate::models::{
    project::{NewProject, Project, ProjectDetail, UpdateProject},
    user::PublicUser,
};
use crate::store::Store;

/// Input for [`create_project`]
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub client: String,
}

/// Loads a project or fails with `NotFound("project does not exist")`
pub(crate) async fn load_project(store: &dyn Store, id: Uuid) -> ServiceResult<Project> {
    store
        .find_project(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("project"))
}

/// Projects the actor created or collaborates on
pub async fn list_projects(store: &dyn Store, actor: Uuid) -> ServiceResult<Vec<Project>> {
    Ok(store.list_projects_for_user(actor).await?)
}

/// Creates a project owned by `actor`
///
/// A missing due date defaults to now.
pub async fn create_project(
    store: &dyn Store,
    actor: Uuid,
    input: ProjectInput,
) -> ServiceResult<Project> {
    let name = required("name", &input.name, NAME_MAX_CHARS)?;
    let client = required("client", &input.client, CLIENT_MAX_CHARS)?;
    bounded("description", input.description.trim(), DESCRIPTION_MAX_CHARS)?;

    let project = store
        .insert_project(NewProject {
            name,
            description: input.description.trim().to_string(),
            due_date: input.due_date.unwrap_or_else(Utc::now),
            client,
            creator: actor,
        })
        .await?;

    info!(project_id = %project.id, creator = %actor, "Project created");
    Ok(project)
}

/// Project with collaborator profiles and task records
///
/// Readable by the creator and collaborators.
pub async fn get_project(store: &dyn Store, actor: Uuid, id: Uuid) -> ServiceResult<ProjectDetail> {
    let project = load_project(store, id).await?;
    require_project_access(actor, &project, ProjectAction::View)?;

    let collaborator_profiles = store
        .find_users(&project.collaborators)
        .await?
        .iter()
        .map(PublicUser::from)
        .collect();
    let task_records = store.list_tasks_for_project(project.id).await?;

    Ok(ProjectDetail {
        project,
        collaborator_profiles,
        task_records,
    })
}

/// Applies a metadata patch; creator only
///
/// Present fields overwrite, including empty strings; absent fields keep
/// their stored value.
pub async fn edit_project(
    store: &dyn Store,
    actor: Uuid,
    id: Uuid,
    patch: UpdateProject,
) -> ServiceResult<Project> {
    let mut project = load_project(store, id).await?;
    require_project_access(actor, &project, ProjectAction::Edit)?;

    bounded_opt("name", patch.name.as_ref(), NAME_MAX_CHARS)?;
    bounded_opt("description", patch.description.as_ref(), DESCRIPTION_MAX_CHARS)?;
    bounded_opt("client", patch.client.as_ref(), CLIENT_MAX_CHARS)?;

    patch.apply(&mut project);
    let project = store.save_project(&project).await?;

    info!(project_id = %project.id, "Project updated");
    Ok(project)
}

/// Deletes the project and its tasks; creator only
pub async fn delete_project(store: &dyn Store, actor: Uuid, id: Uuid) -> ServiceResult<()> {
    let project = load_project(store, id).await?;
    require_project_access(actor, &project, ProjectAction::Delete)?;

    store.delete_project(project.id).await?;

    info!(project_id = %project.id, tasks = project.tasks.len(), "Project deleted");
    Ok(())
}
