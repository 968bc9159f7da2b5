use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    Extension,
};
use pipeline_client::{MoveRequest, MoveResponse, StageColumn};
use std::sync::Arc;
use tokio::time::Instant;

use crate::models::CurrentUser;
use crate::utils::logging::*;
use crate::utils::AppResult;
use crate::AppState;

/// GET /api/pipeline - quadro com as etapas e os clientes visíveis
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<StageColumn>>> {
    let board = state.clients.board(&user).await?;
    Ok(Json(board))
}

/// POST /api/pipeline/move - efetiva a troca de etapa (com venda opcional)
pub async fn move_client(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> AppResult<Json<MoveResponse>> {
    let start_time = Instant::now();
    log_request_received("/api/pipeline/move", "POST");

    let Json(request) = payload?;
    let client = state.pipeline.move_client(&user, request).await?;

    log_request_processed("/api/pipeline/move", 200, start_time.elapsed().as_millis() as u64);
    Ok(Json(MoveResponse { success: true, client }))
}
