//! # TaskHub Shared Library
//!
//! Domain logic for the TaskHub API server: models, persistence ports and
//! adapters, authentication primitives, the authorization engine, mail and
//! the application services.
//!
//! ## Module Organization
//!
//! - `models`: users, projects and tasks
//! - `store`: persistence traits with PostgreSQL and in-memory adapters
//! - `db`: connection pool and migrations
//! - `auth`: passwords, session tokens, one-time tokens, authorization
//! - `mail`: mailer port, adapters and templates
//! - `services`: account, project, collaborator and task operations

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the TaskHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
