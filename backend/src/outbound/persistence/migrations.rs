//! Embedded schema migrations.
//!
//! Migrations run on a blocking thread over a synchronous connection;
//! `diesel_migrations` has no async harness. The server applies pending
//! migrations at startup before accepting traffic.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not connect to the database.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Apply(String),
    /// The blocking migration task was cancelled or panicked.
    #[error("migration task failed: {0}")]
    Task(String),
}

/// Apply all pending migrations against the given database.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| {
                tracing::info!(count = applied.len(), "migrations applied");
            })
            .map_err(|err| MigrationError::Apply(err.to_string()))
    })
    .await
    .map_err(|err| MigrationError::Task(err.to_string()))?
}
