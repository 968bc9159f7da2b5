//! Cliente HTTP para a API do CRM

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};

use crate::error::{ApiError, Result};
use crate::types::{ErrorBody, MoveRequest, MoveResponse, Product, StageColumn};

/// Header com o identificador do usuário da sessão
pub const SESSION_HEADER: &str = "X-User-Id";

/// Operações do servidor usadas pelo quadro
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// `GET /api/pipeline`: etapas com clientes aninhados (sem arquivados)
    async fn fetch_board(&self) -> Result<Vec<StageColumn>>;

    /// `POST /api/pipeline/move`
    async fn move_client(&self, request: &MoveRequest) -> Result<MoveResponse>;
}

/// Implementação de `PipelineApi` sobre reqwest
#[derive(Clone)]
pub struct HttpPipelineApi {
    http_client: HttpClient,
    base_url: String,
    user_id: String,
}

impl HttpPipelineApi {
    /// Cria um novo cliente
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
        })
    }

    /// Busca o catálogo de produtos para o diálogo de venda
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let url = format!("{}/api/products", self.base_url);
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(SESSION_HEADER, &self.user_id)
            .send()
            .await?;

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl PipelineApi for HttpPipelineApi {
    async fn fetch_board(&self) -> Result<Vec<StageColumn>> {
        let url = format!("{}/api/pipeline", self.base_url);
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(SESSION_HEADER, &self.user_id)
            .send()
            .await?;

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }

    async fn move_client(&self, request: &MoveRequest) -> Result<MoveResponse> {
        let url = format!("{}/api/pipeline/move", self.base_url);
        tracing::debug!(
            "POST {} client={} stage={} sale={}",
            url,
            request.client_id,
            request.new_stage_id,
            request.sale_data.is_some()
        );

        let response = self
            .http_client
            .post(&url)
            .header(SESSION_HEADER, &self.user_id)
            .json(request)
            .send()
            .await?;

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }
}

/// Converte respostas não-2xx em `ApiError::Status` com a mensagem do corpo `{error}`
async fn handle_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    tracing::error!("CRM API error ({}): {}", status_code, error_body);

    let message = serde_json::from_str::<ErrorBody>(&error_body)
        .map(|b| b.error)
        .unwrap_or(error_body);

    Err(ApiError::Status {
        status: status_code,
        message,
    })
}
