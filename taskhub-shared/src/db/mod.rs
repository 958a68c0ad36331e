/// PostgreSQL plumbing
///
/// - `pool`: connection pool creation and health probing
/// - `migrations`: embedded schema migrations from the workspace `migrations/` directory
///
/// The store implementation built on top of the pool lives in
/// [`crate::store::postgres`].

pub mod migrations;
pub mod pool;
