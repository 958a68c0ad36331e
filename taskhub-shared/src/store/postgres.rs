//! PostgreSQL store.
//!
//! Collaborator and task lists are not columns: they are read back from
//! `project_collaborators` and `tasks` ordered by their `seq` column, so a
//! project's lists always agree with the rows that reference it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{ProjectStore, Store, StoreError, StoreResult, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    project::{NewProject, Project},
    task::{NewTask, Task},
    user::{NewUser, User},
};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, confirmed, token_hash, created_at, updated_at";

const PROJECT_COLUMNS: &str =
    "id, name, description, due_date, client, creator_id, created_at, updated_at";

const TASK_COLUMNS: &str = "id, name, description, state, due_date, priority, project_id, \
     completed_by, created_at, updated_at";

/// `projects` row before its collaborator and task lists are attached
#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    name: String,
    description: String,
    due_date: DateTime<Utc>,
    client: String,
    creator_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProjectRow {
    fn into_project(self, collaborators: Vec<Uuid>, tasks: Vec<Uuid>) -> Project {
        Project {
            id: self.id,
            name: self.name,
            description: self.description,
            due_date: self.due_date,
            client: self.client,
            creator: self.creator_id,
            collaborators,
            tasks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL-backed implementation of [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches collaborator and task lists to project rows in two queries
    async fn hydrate(&self, rows: Vec<ProjectRow>) -> StoreResult<Vec<Project>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let collaborator_rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT project_id, user_id FROM project_collaborators
             WHERE project_id = ANY($1)
             ORDER BY seq",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let task_rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT project_id, id FROM tasks
             WHERE project_id = ANY($1)
             ORDER BY seq",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut collaborators: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (project_id, user_id) in collaborator_rows {
            collaborators.entry(project_id).or_default().push(user_id);
        }

        let mut tasks: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (project_id, task_id) in task_rows {
            tasks.entry(project_id).or_default().push(task_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_project(
                    collaborators.remove(&id).unwrap_or_default(),
                    tasks.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }

    async fn hydrate_one(&self, row: ProjectRow) -> StoreResult<Project> {
        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or(StoreError::NotFound)
    }

    async fn require_project(&self, id: Uuid) -> StoreResult<Project> {
        self.find_project(id).await?.ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, token_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.token_hash)
        .fetch_one(&self.pool)
        .await?;

        debug!(user_id = %user.id, "Inserted user");
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_token(&self, token_hash: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token_hash = $1"
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn save_user(&self, user: &User) -> StoreResult<User> {
        let saved = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = $2, email = $3, password_hash = $4, confirmed = $5,
                 token_hash = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.confirmed)
        .bind(&user.token_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(saved)
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<Uuid, User> = users.into_iter().map(|u| (u.id, u)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, project: NewProject) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "INSERT INTO projects (name, description, due_date, client, creator_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.due_date)
        .bind(&project.client)
        .bind(project.creator)
        .fetch_one(&self.pool)
        .await?;

        debug!(project_id = %row.id, "Inserted project");
        Ok(row.into_project(Vec::new(), Vec::new()))
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate_one(row).await?)),
            None => Ok(None),
        }
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects
             WHERE creator_id = $1
                OR id IN (SELECT project_id FROM project_collaborators WHERE user_id = $1)
             ORDER BY created_at, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn save_project(&self, project: &Project) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "UPDATE projects
             SET name = $2, description = $3, due_date = $4, client = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.due_date)
        .bind(&project.client)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        self.hydrate_one(row).await
    }

    async fn add_collaborator(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project> {
        // Primary key on (project_id, user_id) rejects duplicates, foreign
        // keys reject unknown projects and users.
        sqlx::query("INSERT INTO project_collaborators (project_id, user_id) VALUES ($1, $2)")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        self.require_project(project_id).await
    }

    async fn remove_collaborator(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<Project> {
        sqlx::query("DELETE FROM project_collaborators WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        self.require_project(project_id).await
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        // Collaborators and tasks go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut tx = self.pool.begin().await?;

        // Holds the project row so a concurrent delete cannot orphan the task
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(task.project)
                .fetch_optional(&mut *tx)
                .await?;

        if exists.is_none() {
            return Err(StoreError::NotFound);
        }

        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (name, description, due_date, priority, project_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(task.project)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
            .bind(task.project)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(task_id = %task.id, project_id = %task.project, "Inserted task");
        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY seq"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Task> {
        let saved = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET name = $2, description = $3, state = $4, due_date = $5,
                 priority = $6, completed_by = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.state)
        .bind(task.due_date)
        .bind(task.priority)
        .bind(task.completed_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(saved)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<()> {
        // The task list is derived from the row, so one statement detaches
        // and deletes.
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(StoreError::from)
    }
}
