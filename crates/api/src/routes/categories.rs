//! Public category routes.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::Result;
use crate::models::Category;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.store().list_categories().await?;
    Ok(Json(categories))
}
