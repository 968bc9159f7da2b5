/// Middleware de autenticação para endpoints administrativos
///
/// Valida que a requisição contém um API key válido no header X-Admin-Key.
/// Protege o cadastro de usuários e o diagnóstico do banco.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::AppError;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Resultado da verificação do API key administrativo
#[derive(Debug, PartialEq, Eq)]
pub enum AdminAccess {
    Granted,
    /// Sem ADMIN_API_KEY em desenvolvimento: libera com aviso
    GrantedUnconfigured,
    Denied,
    /// Sem ADMIN_API_KEY em produção: bloqueia
    Unavailable,
}

pub fn check_admin_access(expected: Option<&str>, provided: Option<&str>, is_production: bool) -> AdminAccess {
    match (expected, provided, is_production) {
        (Some(expected), Some(provided), _) if expected == provided => AdminAccess::Granted,
        (Some(_), _, _) => AdminAccess::Denied,
        (None, _, false) => AdminAccess::GrantedUnconfigured,
        (None, _, true) => AdminAccess::Unavailable,
    }
}

/// Middleware que requer API key para acesso aos endpoints /admin/*
///
/// # Configuração
///
/// ```bash
/// export ADMIN_API_KEY="your-secure-random-key-here"
/// ```
///
/// # Uso na requisição
///
/// ```bash
/// curl -X POST -H "X-Admin-Key: your-secure-random-key-here" \
///   -H "Content-Type: application/json" \
///   -d '{"name":"Ana","email":"ana@empresa.com","role":"GESTOR"}' \
///   http://localhost:8080/admin/users
/// ```
///
/// # Respostas
///
/// - **401 Unauthorized**: Key ausente ou inválido
/// - **503 Service Unavailable**: ADMIN_API_KEY ausente em produção
pub async fn require_admin_key(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let provided_key = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    let expected_key = std::env::var("ADMIN_API_KEY").ok();

    let is_production = std::env::var("RUST_ENV")
        .unwrap_or_else(|_| "development".to_string())
        == "production";

    match check_admin_access(expected_key.as_deref(), provided_key, is_production) {
        AdminAccess::Granted => {
            tracing::debug!("✅ Admin access granted");
            Ok(next.run(request).await)
        }
        AdminAccess::GrantedUnconfigured => {
            tracing::warn!(
                "⚠️  ADMIN_API_KEY not configured - Allowing access in development mode. \
                 Configure ADMIN_API_KEY in production!"
            );
            Ok(next.run(request).await)
        }
        AdminAccess::Denied => {
            tracing::warn!(
                "❌ Admin access denied - Invalid or missing X-Admin-Key: {:?}",
                provided_key.map(|_| "<redacted>")
            );
            Err(AppError::Unauthorized("Missing or invalid X-Admin-Key header".to_string()).into_response())
        }
        AdminAccess::Unavailable => {
            tracing::error!("🚨 ADMIN_API_KEY not configured in production! Blocking admin access.");
            Err(service_unavailable_response())
        }
    }
}

/// Resposta 503 quando o servidor não tem ADMIN_API_KEY em produção
fn service_unavailable_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "error": "ADMIN_API_KEY not configured on server",
            "status": StatusCode::SERVICE_UNAVAILABLE.as_u16()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_key_validation_logic() {
        assert_eq!(check_admin_access(Some("k"), Some("k"), true), AdminAccess::Granted);
        assert_eq!(check_admin_access(Some("k"), Some("x"), false), AdminAccess::Denied);
        assert_eq!(check_admin_access(Some("k"), None, false), AdminAccess::Denied);
        assert_eq!(check_admin_access(None, None, false), AdminAccess::GrantedUnconfigured);
        assert_eq!(check_admin_access(None, Some("k"), true), AdminAccess::Unavailable);
    }
}
