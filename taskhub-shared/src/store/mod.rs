//! Persistence ports for users, projects and tasks.
//!
//! Services depend only on these traits. Two adapters implement them:
//! [`postgres::PgStore`] for the running service and [`memory::InMemoryStore`]
//! for tests and local development.
//!
//! Every operation that touches more than one record is a single unit of
//! work in both adapters: creating a task appends it to its project,
//! deleting a task detaches it, deleting a project removes its tasks.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    project::{NewProject, Project},
    task::{NewTask, Task},
    user::{NewUser, User},
};

pub mod memory;
pub mod postgres;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// A uniqueness rule was violated; carries the rule's name.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict(
                db_err.constraint().unwrap_or("unique").to_string(),
            ),
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound
            }
            other => StoreError::Persistence(other.to_string()),
        }
    }
}

/// User persistence contract.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact, case-sensitive email match.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Finds the user holding the pending token with this SHA-256 digest.
    async fn find_user_by_token(&self, token_hash: &str) -> StoreResult<Option<User>>;

    /// Persists every mutable user field.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the user does not exist.
    async fn save_user(&self, user: &User) -> StoreResult<User>;

    /// Loads the given users, keeping the order of `ids` and skipping
    /// unknown ones.
    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
}

/// Project persistence contract.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project>;

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Projects the user created or collaborates on, oldest first.
    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>>;

    /// Persists project metadata (name, description, due date, client).
    ///
    /// Collaborators and tasks are managed by their own operations and are
    /// ignored here.
    async fn save_project(&self, project: &Project) -> StoreResult<Project>;

    /// Appends a collaborator.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when the project or user does not exist
    /// - [`StoreError::Conflict`] when the user is already a collaborator
    async fn add_collaborator(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project>;

    /// Removes a collaborator; removing a non-member leaves the project
    /// unchanged.
    async fn remove_collaborator(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project>;

    /// Deletes the project together with its tasks.
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;
}

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a task and appends it to its project's task list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the project does not exist.
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task>;

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;

    /// Tasks of a project in creation order.
    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Persists task metadata, state and completer.
    async fn save_task(&self, task: &Task) -> StoreResult<Task>;

    /// Detaches the task from its project and deletes it.
    async fn delete_task(&self, id: Uuid) -> StoreResult<()>;
}

/// The full persistence surface used by the services.
#[async_trait]
pub trait Store: UserStore + ProjectStore + TaskStore {
    /// Verifies the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
