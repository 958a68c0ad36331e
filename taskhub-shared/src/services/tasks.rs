//! Task operations and the completion toggle.
//!
//! Permissions come from the owning project: the creator may do anything,
//! collaborators may read and toggle.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::fields::{bounded, bounded_opt, required, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};
use super::projects::load_project;
use crate::auth::authorization::{
    require_project_access, require_task_access, ProjectAction, TaskAction,
};
use crate::models::{
    project::Project,
    task::{NewTask, Task, TaskPriority, UpdateTask},
};
use crate::store::Store;

/// Input for [`create_task`]
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub name: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub project: Uuid,
}

/// Loads a task together with its owning project
async fn load_task(store: &dyn Store, id: Uuid) -> ServiceResult<(Task, Project)> {
    let task = store
        .find_task(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("task"))?;
    let project = load_project(store, task.project).await?;

    Ok((task, project))
}

/// Creates a task in the project named by the input; creator only
pub async fn create_task(store: &dyn Store, actor: Uuid, input: TaskInput) -> ServiceResult<Task> {
    let project = load_project(store, input.project).await?;
    require_project_access(actor, &project, ProjectAction::CreateTask)?;

    let name = required("name", &input.name, NAME_MAX_CHARS)?;
    bounded("description", input.description.trim(), DESCRIPTION_MAX_CHARS)?;

    let task = store
        .insert_task(NewTask {
            name,
            description: input.description.trim().to_string(),
            due_date: input.due_date.unwrap_or_else(Utc::now),
            priority: input.priority.unwrap_or_default(),
            project: project.id,
        })
        .await?;

    info!(task_id = %task.id, project_id = %project.id, "Task created");
    Ok(task)
}

/// A single task; readable by the creator and collaborators
pub async fn get_task(store: &dyn Store, actor: Uuid, id: Uuid) -> ServiceResult<Task> {
    let (task, project) = load_task(store, id).await?;
    require_task_access(actor, &task, &project, TaskAction::View)?;

    Ok(task)
}

/// Applies a metadata patch; creator only. The state is never touched.
pub async fn edit_task(
    store: &dyn Store,
    actor: Uuid,
    id: Uuid,
    patch: UpdateTask,
) -> ServiceResult<Task> {
    let (mut task, project) = load_task(store, id).await?;
    require_task_access(actor, &task, &project, TaskAction::Edit)?;

    bounded_opt("name", patch.name.as_ref(), NAME_MAX_CHARS)?;
    bounded_opt("description", patch.description.as_ref(), DESCRIPTION_MAX_CHARS)?;

    patch.apply(&mut task);
    let task = store.save_task(&task).await?;

    info!(task_id = %task.id, "Task updated");
    Ok(task)
}

/// Deletes the task and detaches it from its project; creator only
pub async fn delete_task(store: &dyn Store, actor: Uuid, id: Uuid) -> ServiceResult<()> {
    let (task, project) = load_task(store, id).await?;
    require_task_access(actor, &task, &project, TaskAction::Delete)?;

    store.delete_task(task.id).await?;

    info!(task_id = %task.id, project_id = %project.id, "Task deleted");
    Ok(())
}

/// Flips the completion state and records `actor` as the completer
///
/// Allowed for the creator and collaborators. Toggling a complete task
/// re-opens it.
pub async fn toggle_task_state(store: &dyn Store, actor: Uuid, id: Uuid) -> ServiceResult<Task> {
    let (mut task, project) = load_task(store, id).await?;
    require_task_access(actor, &task, &project, TaskAction::ToggleState)?;

    task.toggle(actor);
    let task = store.save_task(&task).await?;

    info!(task_id = %task.id, completed = task.is_complete(), by = %actor, "Task state toggled");
    Ok(task)
}
