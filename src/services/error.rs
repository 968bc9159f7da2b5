//! Erros da camada de serviços

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Entidade referenciada não existe (ou não é visível para o usuário)
    #[error("{0}")]
    NotFound(String),

    /// Entrada inválida
    #[error("{0}")]
    Validation(String),

    /// Papel sem permissão para a operação
    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Metadata serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
