//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! summit-cli admin promote -e user@example.com
//! ```
//!
//! Accounts register through the API with the `user` role; promotion is a
//! deliberate operator action, never an API call.

use sqlx::PgPool;

use super::CliError;

/// Promote the account with the given email to the admin role.
///
/// # Errors
///
/// Returns `CliError::UserNotFound` if no account matches the email.
pub async fn promote(email: &str) -> Result<(), CliError> {
    let pool = super::connect().await?;
    promote_on(&pool, email).await
}

pub(crate) async fn promote_on(pool: &PgPool, email: &str) -> Result<(), CliError> {
    let result = sqlx::query("UPDATE users SET role = 'admin' WHERE lower(email) = lower($1)")
        .bind(email)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CliError::UserNotFound(email.to_string()));
    }

    tracing::info!(email, "account promoted to admin");
    Ok(())
}
