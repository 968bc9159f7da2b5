//! Tipos de erro para o crate pipeline_client

use thiserror::Error;

use crate::dialog::FieldErrors;

/// Erros da comunicação com o servidor do CRM
#[derive(Debug, Error)]
pub enum ApiError {
    /// Erro de requisição HTTP (rede, timeout, conexão recusada)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resposta não-2xx do servidor
    #[error("CRM API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Erro de configuração do cliente
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Falhas ao aplicar uma movimentação no cache do quadro
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Etapa não encontrada no quadro: {0}")]
    StageNotFound(String),

    #[error("Cliente {client_id} não está na etapa {stage_id}")]
    ClientNotInStage { client_id: String, stage_id: String },
}

/// Falhas ao confirmar o diálogo de venda
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaleConfirmError {
    /// Nenhuma transição aguardando dados de venda
    #[error("Nenhuma venda aguardando confirmação")]
    NoPendingSale,

    /// Campos inválidos; o diálogo continua aberto
    #[error("Campos inválidos no diálogo de venda")]
    InvalidFields(FieldErrors),
}

impl SaleConfirmError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidFields(errors) => Some(errors),
            Self::NoPendingSale => None,
        }
    }
}

/// Tipo Result padrão para chamadas de API
pub type Result<T> = std::result::Result<T, ApiError>;
