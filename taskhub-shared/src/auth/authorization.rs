/// Project and task authorization
///
/// Pure decision logic: given an actor, a project (and for task actions the
/// task), and an action, decide allow or deny. No I/O happens here; callers
/// load the resources first so that a missing resource is reported as not
/// found before any authorization decision is made.
///
/// # Permission Model
///
/// Every actor holds exactly one [`Role`] on a project:
///
/// | Action                     | Creator | Collaborator | None |
/// |----------------------------|:-------:|:------------:|:----:|
/// | View project / view task   |   yes   |     yes      |  no  |
/// | Toggle task state          |   yes   |     yes      |  no  |
/// | Edit / delete project      |   yes   |      no      |  no  |
/// | Manage collaborators       |   yes   |      no      |  no  |
/// | Create / edit / delete task|   yes   |      no      |  no  |
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::authorization::{can_access, ProjectAction, Role};
/// # use taskhub_shared::models::project::Project;
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # let creator = Uuid::new_v4();
/// # let project = Project {
/// #     id: Uuid::new_v4(), name: "P".into(), description: String::new(),
/// #     due_date: Utc::now(), client: "C".into(), creator,
/// #     collaborators: vec![], tasks: vec![],
/// #     created_at: Utc::now(), updated_at: Utc::now(),
/// # };
///
/// assert_eq!(Role::of(creator, &project), Role::Creator);
/// assert!(can_access(creator, &project, ProjectAction::Edit));
/// assert!(!can_access(Uuid::new_v4(), &project, ProjectAction::View));
/// ```

use std::fmt;

use uuid::Uuid;

use crate::models::{project::Project, task::Task};

/// An actor's standing on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Created the project; holds every right
    Creator,

    /// Added by the creator; may read and toggle task state
    Collaborator,

    /// No relationship with the project
    None,
}

impl Role {
    /// Resolves the actor's role on `project`
    pub fn of(actor: Uuid, project: &Project) -> Role {
        if project.creator == actor {
            Role::Creator
        } else if project.has_collaborator(actor) {
            Role::Collaborator
        } else {
            Role::None
        }
    }

    /// Creator or collaborator
    pub fn is_member(&self) -> bool {
        matches!(self, Role::Creator | Role::Collaborator)
    }
}

/// Actions on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    View,
    Edit,
    Delete,
    ManageCollaborators,
    CreateTask,
}

impl ProjectAction {
    fn allows(&self, role: Role) -> bool {
        match self {
            ProjectAction::View => role.is_member(),
            ProjectAction::Edit
            | ProjectAction::Delete
            | ProjectAction::ManageCollaborators
            | ProjectAction::CreateTask => role == Role::Creator,
        }
    }
}

/// Actions on a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    View,
    ToggleState,
    Edit,
    Delete,
}

impl TaskAction {
    fn allows(&self, role: Role) -> bool {
        match self {
            TaskAction::View | TaskAction::ToggleState => role.is_member(),
            TaskAction::Edit | TaskAction::Delete => role == Role::Creator,
        }
    }
}

impl fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectAction::View => "view this project",
            ProjectAction::Edit => "edit this project",
            ProjectAction::Delete => "delete this project",
            ProjectAction::ManageCollaborators => "manage collaborators of this project",
            ProjectAction::CreateTask => "add tasks to this project",
        };
        f.write_str(s)
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskAction::View => "view this task",
            TaskAction::ToggleState => "change the state of this task",
            TaskAction::Edit => "edit this task",
            TaskAction::Delete => "delete this task",
        };
        f.write_str(s)
    }
}

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// The actor's role does not permit the action
    #[error("Not allowed to {action}")]
    Denied { role: Role, action: String },
}

/// Whether `actor` may perform `action` on `project`
pub fn can_access(actor: Uuid, project: &Project, action: ProjectAction) -> bool {
    action.allows(Role::of(actor, project))
}

/// Whether `actor` may perform `action` on `task`
///
/// `project` must be the task's owning project; a mismatched pair is denied.
pub fn can_access_task(actor: Uuid, task: &Task, project: &Project, action: TaskAction) -> bool {
    task.project == project.id && action.allows(Role::of(actor, project))
}

/// Requires a project permission, returning the actor's role on success
pub fn require_project_access(
    actor: Uuid,
    project: &Project,
    action: ProjectAction,
) -> Result<Role, AuthzError> {
    let role = Role::of(actor, project);

    if !action.allows(role) {
        return Err(AuthzError::Denied {
            role,
            action: action.to_string(),
        });
    }

    Ok(role)
}

/// Requires a task permission, returning the actor's role on success
pub fn require_task_access(
    actor: Uuid,
    task: &Task,
    project: &Project,
    action: TaskAction,
) -> Result<Role, AuthzError> {
    let role = Role::of(actor, project);

    if !can_access_task(actor, task, project, action) {
        return Err(AuthzError::Denied {
            role,
            action: action.to_string(),
        });
    }

    Ok(role)
}
