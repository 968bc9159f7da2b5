use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::models::{NewUser, User};
use crate::utils::AppResult;
use crate::AppState;

/// POST /admin/users - cadastro de usuários (bootstrap, protegido por X-Admin-Key)
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let Json(input) = payload?;
    let user = state.users.create(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /admin/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.users.list().await?))
}
