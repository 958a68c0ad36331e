/// Domain models for TaskHub
///
/// Plain records plus the create/update inputs for each of them. Storage is
/// handled by the traits in [`crate::store`].
///
/// # Models
///
/// - `user`: User accounts, credentials and one-time tokens
/// - `project`: Projects, collaborator sets and task references
/// - `task`: Tasks and their completion state
///
/// # Example
///
/// ```
/// use taskhub_shared::models::project::UpdateProject;
///
/// // Only the name is replaced; every other field keeps its stored value
/// let patch = UpdateProject {
///     name: Some("Website v2".to_string()),
///     ..Default::default()
/// };
/// assert!(!patch.is_empty());
/// ```

pub mod project;
pub mod task;
pub mod user;
