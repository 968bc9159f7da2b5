//! Sessão do usuário
//!
//! O header `X-User-Id` identifica o usuário; o middleware resolve o cadastro
//! e injeta `CurrentUser` nas extensions da requisição.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use pipeline_client::SESSION_HEADER;

use crate::models::CurrentUser;
use crate::utils::logging::log_access_denied;
use crate::utils::{AppError, AppResult};
use crate::AppState;

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("Header {} ausente", SESSION_HEADER)))?
        .to_string();

    let user = state
        .users
        .find(&user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Sessão inválida".to_string()))?;

    tracing::debug!("🔐 Sessão: {} ({})", user.name, user.role.as_str());
    request.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(request).await)
}

/// Rotas de configuração são exclusivas do GESTOR
pub fn require_manager(user: &CurrentUser, action: &str) -> AppResult<()> {
    if user.is_manager() {
        return Ok(());
    }
    log_access_denied(&user.id, action);
    Err(AppError::Forbidden(format!("Apenas gestores podem {}", action)))
}
