//! Database migration command.
//!
//! Applies the embedded migrations from `crates/api/migrations/` to the
//! database named by `DATABASE_URL`. Already-applied migrations are
//! skipped.

use super::CliError;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
