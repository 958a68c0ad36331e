//! In-memory store for tests and local development.
//!
//! All records live behind a single `RwLock`, so every operation, including
//! the multi-record ones, is atomic with respect to the others.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{ProjectStore, Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    project::{NewProject, Project},
    task::{NewTask, Task},
    user::{NewUser, User},
};

/// Thread-safe in-memory implementation of [`Store`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<InMemoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    /// Project ids in creation order
    project_order: Vec<Uuid>,
    tasks: HashMap<Uuid, Task>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InMemoryState>> {
        self.state
            .read()
            .map_err(|err| StoreError::Persistence(err.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, InMemoryState>> {
        self.state
            .write()
            .map_err(|err| StoreError::Persistence(err.to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.write()?;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            confirmed: false,
            token_hash: user.token_hash,
            created_at: now,
            updated_at: now,
        };

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_token(&self, token_hash: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.token_hash.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn save_user(&self, user: &User) -> StoreResult<User> {
        let mut state = self.write()?;

        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        let stored = state.users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        *stored = User {
            updated_at: Utc::now(),
            created_at: stored.created_at,
            ..user.clone()
        };

        Ok(stored.clone())
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        let mut state = self.write()?;

        if !state.users.contains_key(&project.creator) {
            return Err(StoreError::NotFound);
        }

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: project.name,
            description: project.description,
            due_date: project.due_date,
            client: project.client,
            creator: project.creator,
            collaborators: Vec::new(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        state.project_order.push(project.id);
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state
            .project_order
            .iter()
            .filter_map(|id| state.projects.get(id))
            .filter(|p| p.creator == user_id || p.has_collaborator(user_id))
            .cloned()
            .collect())
    }

    async fn save_project(&self, project: &Project) -> StoreResult<Project> {
        let mut state = self.write()?;
        let stored = state
            .projects
            .get_mut(&project.id)
            .ok_or(StoreError::NotFound)?;

        stored.name = project.name.clone();
        stored.description = project.description.clone();
        stored.due_date = project.due_date;
        stored.client = project.client.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn add_collaborator(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project> {
        let mut state = self.write()?;

        if !state.users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }

        let project = state
            .projects
            .get_mut(&project_id)
            .ok_or(StoreError::NotFound)?;

        if project.has_collaborator(user_id) {
            return Err(StoreError::Conflict(
                "project_collaborators_pkey".to_string(),
            ));
        }

        project.collaborators.push(user_id);
        Ok(project.clone())
    }

    async fn remove_collaborator(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project> {
        let mut state = self.write()?;
        let project = state
            .projects
            .get_mut(&project_id)
            .ok_or(StoreError::NotFound)?;

        project.collaborators.retain(|id| *id != user_id);
        Ok(project.clone())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.write()?;
        let project = state.projects.remove(&id).ok_or(StoreError::NotFound)?;

        state.project_order.retain(|p| *p != id);
        for task_id in &project.tasks {
            state.tasks.remove(task_id);
        }

        Ok(())
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut state = self.write()?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            name: task.name,
            description: task.description,
            state: false,
            due_date: task.due_date,
            priority: task.priority,
            project: task.project,
            completed_by: None,
            created_at: now,
            updated_at: now,
        };

        let project = state
            .projects
            .get_mut(&task.project)
            .ok_or(StoreError::NotFound)?;
        project.tasks.push(task.id);

        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        let Some(project) = state.projects.get(&project_id) else {
            return Ok(Vec::new());
        };

        Ok(project
            .tasks
            .iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect())
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Task> {
        let mut state = self.write()?;
        let stored = state.tasks.get_mut(&task.id).ok_or(StoreError::NotFound)?;

        // The owning project never changes
        *stored = Task {
            project: stored.project,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..task.clone()
        };

        Ok(stored.clone())
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.write()?;
        let task = state.tasks.remove(&id).ok_or(StoreError::NotFound)?;

        if let Some(project) = state.projects.get_mut(&task.project) {
            project.tasks.retain(|t| *t != id);
        }

        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
