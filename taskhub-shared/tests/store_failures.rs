/// Services over a store whose writes fail
///
/// Run with: cargo test -p taskhub-shared --test store_failures

use async_trait::async_trait;
use taskhub_shared::models::{
    project::{NewProject, Project, UpdateProject},
    task::{NewTask, Task},
    user::{NewUser, User},
};
use taskhub_shared::services::{
    projects::{self, ProjectInput},
    tasks::{self, TaskInput},
    ServiceError,
};
use taskhub_shared::store::{
    memory::InMemoryStore, ProjectStore, Store, StoreError, StoreResult, TaskStore, UserStore,
};
use uuid::Uuid;

const DB_DETAIL: &str = "connection reset by peer (10.0.0.7:5432)";

/// Reads go to the wrapped store, every write fails
struct ReadOnlyStore {
    inner: InMemoryStore,
}

fn write_failure<T>() -> StoreResult<T> {
    Err(StoreError::Persistence(DB_DETAIL.to_string()))
}

#[async_trait]
impl UserStore for ReadOnlyStore {
    async fn insert_user(&self, _user: NewUser) -> StoreResult<User> {
        write_failure()
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.inner.find_user_by_id(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.inner.find_user_by_email(email).await
    }

    async fn find_user_by_token(&self, token_hash: &str) -> StoreResult<Option<User>> {
        self.inner.find_user_by_token(token_hash).await
    }

    async fn save_user(&self, _user: &User) -> StoreResult<User> {
        write_failure()
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        self.inner.find_users(ids).await
    }
}

#[async_trait]
impl ProjectStore for ReadOnlyStore {
    async fn insert_project(&self, _project: NewProject) -> StoreResult<Project> {
        write_failure()
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        self.inner.find_project(id).await
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        self.inner.list_projects_for_user(user_id).await
    }

    async fn save_project(&self, _project: &Project) -> StoreResult<Project> {
        write_failure()
    }

    async fn add_collaborator(&self, _project_id: Uuid, _user_id: Uuid) -> StoreResult<Project> {
        write_failure()
    }

    async fn remove_collaborator(&self, _project_id: Uuid, _user_id: Uuid) -> StoreResult<Project> {
        write_failure()
    }

    async fn delete_project(&self, _id: Uuid) -> StoreResult<()> {
        write_failure()
    }
}

#[async_trait]
impl TaskStore for ReadOnlyStore {
    async fn insert_task(&self, _task: NewTask) -> StoreResult<Task> {
        write_failure()
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        self.inner.find_task(id).await
    }

    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        self.inner.list_tasks_for_project(project_id).await
    }

    async fn save_task(&self, _task: &Task) -> StoreResult<Task> {
        write_failure()
    }

    async fn delete_task(&self, _id: Uuid) -> StoreResult<()> {
        write_failure()
    }
}

#[async_trait]
impl Store for ReadOnlyStore {
    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

/// A project with one open task, written through the healthy store
async fn seeded() -> (ReadOnlyStore, Uuid, Project, Task) {
    let inner = InMemoryStore::new();
    let creator = Uuid::new_v4();

    let project = projects::create_project(
        &inner,
        creator,
        ProjectInput {
            name: "Website".to_string(),
            description: String::new(),
            due_date: None,
            client: "ACME".to_string(),
        },
    )
    .await
    .unwrap();
    let task = tasks::create_task(
        &inner,
        creator,
        TaskInput {
            name: "Design".to_string(),
            description: String::new(),
            due_date: None,
            priority: None,
            project: project.id,
        },
    )
    .await
    .unwrap();
    let project = inner.find_project(project.id).await.unwrap().unwrap();

    (ReadOnlyStore { inner }, creator, project, task)
}

fn is_internal(err: &ServiceError) -> bool {
    matches!(err, ServiceError::Internal(msg) if msg == DB_DETAIL)
}

#[tokio::test]
async fn test_edit_project_write_failure_is_internal() {
    let (store, creator, project, _) = seeded().await;

    let patch = UpdateProject {
        name: Some("Website v2".to_string()),
        ..Default::default()
    };
    let err = projects::edit_project(&store, creator, project.id, patch)
        .await
        .unwrap_err();

    assert!(is_internal(&err), "unexpected error: {:?}", err);
    let stored = store.inner.find_project(project.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Website");
    assert_eq!(stored.updated_at, project.updated_at);
}

#[tokio::test]
async fn test_toggle_write_failure_is_internal() {
    let (store, creator, _, task) = seeded().await;

    let err = tasks::toggle_task_state(&store, creator, task.id)
        .await
        .unwrap_err();

    assert!(is_internal(&err), "unexpected error: {:?}", err);
    let stored = store.inner.find_task(task.id).await.unwrap().unwrap();
    assert!(!stored.state);
    assert_eq!(stored.completed_by, None);
}

#[tokio::test]
async fn test_delete_task_write_failure_is_internal() {
    let (store, creator, project, task) = seeded().await;

    let err = tasks::delete_task(&store, creator, task.id).await.unwrap_err();

    assert!(is_internal(&err), "unexpected error: {:?}", err);
    assert!(store.inner.find_task(task.id).await.unwrap().is_some());
    let stored = store.inner.find_project(project.id).await.unwrap().unwrap();
    assert_eq!(stored.tasks, vec![task.id]);
}

#[tokio::test]
async fn test_checks_still_run_before_writes() {
    let (store, _, project, task) = seeded().await;
    let outsider = Uuid::new_v4();

    let err = tasks::delete_task(&store, outsider, task.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Authorization(_)));

    let err = projects::edit_project(&store, outsider, Uuid::new_v4(), UpdateProject::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let detail = projects::get_project(&store, project.creator, project.id)
        .await
        .unwrap();
    assert_eq!(detail.project.id, project.id);
}
