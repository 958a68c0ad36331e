/// API route handlers
///
/// Handlers are thin: they extract the request, run `validator` rules on the
/// body, call into `taskhub_shared::services` and map the result.
///
/// - `health`: Health check endpoint
/// - `auth`: Account endpoints (register, login, confirmation, password reset, profile)
/// - `projects`: Project CRUD
/// - `collaborators`: Collaborator search and membership
/// - `tasks`: Task CRUD and the completion toggle

pub mod auth;
pub mod collaborators;
pub mod health;
pub mod projects;
pub mod tasks;
