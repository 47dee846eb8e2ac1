//! Bearer-token authentication extractors.
//!
//! Tokens carry only the user ID; each request re-fetches the user so a
//! deleted account or a demoted admin loses access immediately, not at
//! token expiry.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Extracts the authenticated user from the `Authorization` header.
///
/// Rejects with 401 when the header is missing, malformed, the token fails
/// verification, or the user no longer exists.
pub struct CurrentUser(pub User);

/// Extracts the authenticated user and requires the admin role.
///
/// Rejects with 403 when the token is valid but the user is not an admin.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;
        let user_id = state
            .auth()
            .verify_token(token)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;
        let user = state
            .store()
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/orders/my")
            .header(axum::http::header::AUTHORIZATION, value)
            .body(())
            .map(Request::into_parts)
            .unwrap_or_else(|_| unreachable!());
        parts
    }

    #[test]
    fn bearer_prefix_is_required() {
        let parts = parts_with_auth("Token abc123");
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn token_is_extracted_and_trimmed() {
        let parts = parts_with_auth("Bearer  abc123 ");
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let parts = parts_with_auth("Bearer ");
        assert!(bearer_token(&parts).is_none());
    }
}
