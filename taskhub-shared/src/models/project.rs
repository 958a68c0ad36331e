/// Project model
///
/// A project is owned by its creator and shared with an ordered set of
/// collaborators. The creator is never part of the collaborator list; the two
/// tiers are resolved through [`crate::auth::authorization::Role`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     due_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     client VARCHAR(255) NOT NULL,
///     creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_collaborators (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     seq BIGSERIAL NOT NULL,
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;
use super::user::PublicUser;

/// Project record with its collaborator and task references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Delivery date
    pub due_date: DateTime<Utc>,

    /// Client the project is delivered to
    pub client: String,

    /// User who created the project
    pub creator: Uuid,

    /// Collaborator IDs in insertion order, never containing `creator`
    pub collaborators: Vec<Uuid>,

    /// Task IDs in creation order
    pub tasks: Vec<Uuid>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Whether `user_id` is in the collaborator list
    pub fn has_collaborator(&self, user_id: Uuid) -> bool {
        self.collaborators.contains(&user_id)
    }
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub client: String,
    pub creator: Uuid,
}

/// Partial update for project metadata
///
/// A `Some` field overwrites the stored value, including an empty string.
/// A `None` field keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub client: Option<String>,
}

impl UpdateProject {
    /// Applies the present fields to `project`
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(due_date) = self.due_date {
            project.due_date = due_date;
        }
        if let Some(client) = self.client {
            project.client = client;
        }
    }

    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.client.is_none()
    }
}

/// A project together with its resolved collaborators and tasks
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,

    /// Collaborator profiles in the same order as `project.collaborators`
    pub collaborator_profiles: Vec<PublicUser>,

    /// Task records in the same order as `project.tasks`
    pub task_records: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Website".to_string(),
            description: "Landing page".to_string(),
            due_date: Utc::now(),
            client: "ACME".to_string(),
            creator: Uuid::new_v4(),
            collaborators: vec![],
            tasks: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_project_keeps_absent_fields() {
        let mut project = sample_project();
        let due_date = project.due_date;

        UpdateProject {
            name: Some("Website v2".to_string()),
            ..Default::default()
        }
        .apply(&mut project);

        assert_eq!(project.name, "Website v2");
        assert_eq!(project.description, "Landing page");
        assert_eq!(project.client, "ACME");
        assert_eq!(project.due_date, due_date);
    }

    #[test]
    fn test_update_project_empty_string_overwrites() {
        let mut project = sample_project();

        UpdateProject {
            description: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut project);

        assert_eq!(project.description, "");
    }

    #[test]
    fn test_update_project_from_json_distinguishes_absent() {
        let update: UpdateProject = serde_json::from_str(r#"{"client": ""}"#).unwrap();

        assert!(update.name.is_none());
        assert_eq!(update.client.as_deref(), Some(""));
        assert!(!update.is_empty());
        assert!(UpdateProject::default().is_empty());
    }
}
