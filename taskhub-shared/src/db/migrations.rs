/// Schema migrations
///
/// Migrations live in the workspace-level `migrations/` directory as
/// reversible pairs (`{version}_{name}.up.sql` / `.down.sql`) and are embedded
/// into the binary at compile time.
///
/// ```no_run
/// use taskhub_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies every pending migration
///
/// Each migration runs in its own transaction; a failing one is rolled back
/// and reported.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    let migrator = sqlx::migrate!("../migrations");

    match migrator.run(pool).await {
        Ok(()) => {
            info!(count = migrator.iter().count(), "Database schema up to date");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Creates the database named in `database_url` when it is missing
///
/// Used by the server when started in development mode.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
    } else {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    }

    Ok(())
}
