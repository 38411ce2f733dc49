/// Schema migrations
///
/// The SQL files under `migrations/` are embedded into the binary at
/// compile time, so a deployed server can bring its own schema up to date
/// on boot without shipping the files alongside it.

use sqlx::migrate::{MigrateDatabase, MigrateError, Migrator};
use sqlx::{PgPool, Postgres};
use tracing::info;

/// Embedded migrator over the crate's `migrations/` directory
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies every pending migration
///
/// Already-applied migrations are skipped; a failing migration aborts the
/// run and is returned to the caller.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(
        migrations = MIGRATOR.iter().count(),
        "Applying database migrations"
    );
    MIGRATOR.run(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

/// Creates the database named by the URL when it is missing
///
/// Convenience for development and test setups; production databases are
/// provisioned out of band.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    info!("Database does not exist, creating it");
    Postgres::create_database(database_url).await
}

/// Drops the database named by the URL, data included
///
/// Test teardown only. There is deliberately no force flag; calling this at
/// all is the confirmation.
pub async fn drop_database(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        info!("Dropping database");
        Postgres::drop_database(database_url).await?;
    }

    Ok(())
}
