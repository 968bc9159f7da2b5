use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::middleware::require_manager;
use crate::models::{CurrentUser, NewStage, Stage, StageReorder, StageUpdate};
use crate::utils::AppResult;
use crate::AppState;

pub async fn list_stages(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Stage>>> {
    Ok(Json(state.stages.list().await?))
}

pub async fn create_stage(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<NewStage>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Stage>)> {
    require_manager(&user, "criar etapas")?;
    let Json(input) = payload?;

    let stage = state.stages.create(input).await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

pub async fn update_stage(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    payload: Result<Json<StageUpdate>, JsonRejection>,
) -> AppResult<Json<Stage>> {
    require_manager(&user, "editar etapas")?;
    let Json(input) = payload?;

    Ok(Json(state.stages.update(&id, input).await?))
}

pub async fn delete_stage(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    require_manager(&user, "excluir etapas")?;

    state.stages.delete(&id).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn reorder_stages(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<StageReorder>, JsonRejection>,
) -> AppResult<Json<Vec<Stage>>> {
    require_manager(&user, "reordenar etapas")?;
    let Json(input) = payload?;

    Ok(Json(state.stages.reorder(input).await?))
}

/// PUT /api/stages/:id/closing - torna a etapa a única de fechamento
pub async fn set_closing_stage(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Stage>> {
    require_manager(&user, "definir a etapa de fechamento")?;

    Ok(Json(state.stages.set_closing(&id).await?))
}
