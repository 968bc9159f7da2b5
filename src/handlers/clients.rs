use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use std::sync::Arc;

use crate::models::{ArchiveRequest, Client, CurrentUser, InteractionView, NewClient, NewInteraction};
use crate::utils::AppResult;
use crate::AppState;

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Client>>> {
    Ok(Json(state.clients.list(&user).await?))
}

pub async fn get_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    Ok(Json(state.clients.get(&user, &id).await?))
}

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let Json(input) = payload?;
    let client = state.clients.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn archive_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<ArchiveRequest>, JsonRejection>,
) -> AppResult<Json<Client>> {
    let Json(input) = payload?;
    Ok(Json(state.clients.set_archived(&user, &id, input.archived).await?))
}

/// GET /api/clients/:id/interactions - histórico, mais recente primeiro
pub async fn list_interactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<InteractionView>>> {
    Ok(Json(state.interactions.list_for_client(&user, &id).await?))
}

pub async fn log_interaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<NewInteraction>, JsonRejection>,
) -> AppResult<(StatusCode, Json<InteractionView>)> {
    let Json(input) = payload?;
    let interaction = state.interactions.log(&user, &id, input).await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}
