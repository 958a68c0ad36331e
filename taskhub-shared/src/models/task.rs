/// Task model
///
/// Tasks belong to exactly one project. The project's task list is derived
/// from the `project` back-reference, so creating or deleting a task updates
/// both sides in the same unit of work.
///
/// # State Machine
///
/// ```text
///          toggle (stamps completed_by)
/// pending ◄──────────────────────────► complete
/// ```
///
/// There is a single unconditional transition. `completed_by` records the
/// last actor that toggled the task in either direction.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     seq BIGSERIAL NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     state BOOLEAN NOT NULL DEFAULT FALSE,
///     due_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     priority task_priority NOT NULL DEFAULT 'medium',
///     completed_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Completion flag: false = pending, true = complete
    pub state: bool,

    /// Due date
    pub due_date: DateTime<Utc>,

    /// Priority
    pub priority: TaskPriority,

    /// Owning project
    #[sqlx(rename = "project_id")]
    pub project: Uuid,

    /// Last user who toggled the state
    pub completed_by: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether the task is complete
    pub fn is_complete(&self) -> bool {
        self.state
    }

    /// Flips the completion state and records `actor` as the last toggler
    ///
    /// Re-opening a complete task is allowed and also overwrites
    /// `completed_by`.
    pub fn toggle(&mut self, actor: Uuid) {
        self.state = !self.state;
        self.completed_by = Some(actor);
    }
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub project: Uuid,
}

/// Partial update for task metadata
///
/// State is intentionally absent: the toggle is the only transition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
}

impl UpdateTask {
    /// Applies the present fields to `task`
    pub fn apply(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: Uuid::new_v4(),
            name: "Design".to_string(),
            description: "Wireframes".to_string(),
            state: false,
            due_date: Utc::now(),
            priority: TaskPriority::High,
            project: Uuid::new_v4(),
            completed_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_toggle_flips_and_stamps_actor() {
        let mut task = sample_task();
        let actor = Uuid::new_v4();

        task.toggle(actor);
        assert!(task.is_complete());
        assert_eq!(task.completed_by, Some(actor));

        task.toggle(actor);
        assert!(!task.is_complete());
        assert_eq!(task.completed_by, Some(actor));
    }

    #[test]
    fn test_reopen_overwrites_completed_by() {
        let mut task = sample_task();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        task.toggle(first);
        task.toggle(second);

        assert!(!task.is_complete());
        assert_eq!(task.completed_by, Some(second));
    }

    #[test]
    fn test_update_task_partial() {
        let mut task = sample_task();

        UpdateTask {
            priority: Some(TaskPriority::Low),
            ..Default::default()
        }
        .apply(&mut task);

        assert_eq!(task.priority, TaskPriority::Low);
        assert_eq!(task.name, "Design");
        assert!(!task.state);
    }

    #[test]
    fn test_priority_serialization() {
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"high\"");
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }
}
