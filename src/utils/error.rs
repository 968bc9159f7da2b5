use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

use crate::services::error::ServiceError;
use crate::utils::logging::log_validation_error;

/// Erros dos handlers, convertidos em `{ error, status }`
///
/// - 401 sem sessão
/// - 403 papel sem permissão (rotas de GESTOR)
/// - 400 validação
/// - 404 entidade referenciada ausente
/// - 500 banco/inesperado
#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    Forbidden(String),
    ValidationError(String),
    NotFound(String),
    DatabaseError(sqlx::Error),
    JsonError(serde_json::Error),
    ConfigError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DatabaseError(err) => write!(f, "Database error: {}", err),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Registro não encontrado".to_string()),
            other => AppError::DatabaseError(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(format!("Corpo JSON inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(format!("Parâmetros inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => AppError::NotFound(msg),
            ServiceError::Validation(msg) => AppError::ValidationError(msg),
            ServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            ServiceError::Database(e) => AppError::from(e),
            ServiceError::Serialization(e) => AppError::InternalError(format!("Metadata inválida: {}", e)),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::JsonError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            AppError::ValidationError(msg) => {
                log_validation_error("request", &msg);
                msg
            }
            AppError::Unauthorized(msg) | AppError::Forbidden(msg) | AppError::NotFound(msg) => msg,
            AppError::JsonError(err) => err.to_string(),
            AppError::DatabaseError(err) => {
                tracing::error!("❌ Erro de banco: {}", err);
                "Erro interno ao acessar o banco de dados".to_string()
            }
            AppError::ConfigError(msg) | AppError::InternalError(msg) => {
                tracing::error!("❌ {}", msg);
                msg
            }
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
