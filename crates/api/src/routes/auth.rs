//! Account routes: registration, login, profile.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::models::User;
use crate::services::auth::RegisterInput;
use crate::state::AppState;
use crate::store::ProfileUpdate;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/change-password", put(change_password))
}

#[derive(Debug, Deserialize)]
struct LoginInput {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct ProfileInput {
    name: String,
    phone: Option<String>,
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordInput {
    old_password: String,
    new_password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let (user, token) = state
        .auth()
        .register(state.store().as_ref(), input)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": token, "user": user })),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<serde_json::Value>> {
    let (user, token) = state
        .auth()
        .login(state.store().as_ref(), &input.email, &input.password)
        .await?;
    Ok(Json(json!({ "token": token, "user": user })))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<serde_json::Value>> {
    state
        .store()
        .update_profile(
            user.id,
            ProfileUpdate {
                name: input.name,
                phone: input.phone,
                address: input.address,
            },
        )
        .await?;
    Ok(Json(json!({ "message": "Profile updated" })))
}

async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<ChangePasswordInput>,
) -> Result<Json<serde_json::Value>> {
    state
        .auth()
        .change_password(
            state.store().as_ref(),
            user.id,
            &input.old_password,
            &input.new_password,
        )
        .await?;
    Ok(Json(json!({ "message": "Password changed" })))
}
