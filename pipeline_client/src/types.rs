//! Tipos trafegados entre o quadro e o servidor
//!
//! Todos os campos usam camelCase no JSON, mantendo o formato que o
//! front-end já consome (`clientId`, `newStageId`, `saleData`...).

use serde::{Deserialize, Serialize};

/// Coluna do quadro: uma etapa do funil com seus clientes na ordem exibida
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    pub id: String,
    pub name: String,
    pub color: String,
    pub order: i64,
    /// Etapa de fechamento: entrar nela exige o registro de uma venda
    pub is_closing: bool,
    #[serde(default)]
    pub clients: Vec<ClientCard>,
}

/// Cartão de cliente exibido dentro de uma coluna
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCard {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub potential_value: f64,
    pub stage_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Dados de venda capturados no diálogo ao entrar na etapa de fechamento
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleData {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub sale_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Corpo do POST de movimentação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub new_stage_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_data: Option<SaleData>,
}

/// Cliente com a etapa atual anexada, como devolvido após a movimentação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedClient {
    #[serde(flatten)]
    pub card: ClientCard,
    pub stage: StageSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub id: String,
    pub name: String,
    pub color: String,
    pub is_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub success: bool,
    pub client: MovedClient,
}

/// Corpo padrão de erro do servidor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Produto do catálogo, usado na busca do diálogo de venda
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub price: f64,
}
