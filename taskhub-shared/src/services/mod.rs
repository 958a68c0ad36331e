//! Application services.
//!
//! Free async functions over `&dyn Store` (and `&dyn Mailer` where mail is
//! sent). Each takes the authenticated actor explicitly; the HTTP layer only
//! translates requests into these calls and [`ServiceError`] into responses.
//!
//! - [`accounts`]: registration, confirmation, login, password recovery
//! - [`projects`]: project CRUD and the populated project view
//! - [`collaborators`]: collaborator lookup, add and remove
//! - [`tasks`]: task CRUD and the completion toggle

pub mod accounts;
pub mod collaborators;
pub mod error;
pub mod fields;
pub mod projects;
pub mod tasks;

pub use error::{ServiceError, ServiceResult};
