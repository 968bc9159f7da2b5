//! Interações: trilha de auditoria imutável de cada cliente
//!
//! Cada linha tem um `type` livre (ex: "STATUS_CHANGE", "VENDA", "LIGACAO")
//! e um payload estruturado opcional gravado como JSON com discriminador
//! `kind`. Linhas antigas sem `kind` ainda têm o valor de venda lido.

use chrono::{DateTime, Utc};
use pipeline_client::SaleData;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Payload estruturado da interação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InteractionPayload {
    #[serde(rename_all = "camelCase")]
    StageTransition {
        new_stage_id: String,
        new_stage: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_stage_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Sale {
        sale_value: f64,
        product_id: String,
        product_name: String,
        quantity: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_stage_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_stage: Option<String>,
    },
}

impl InteractionPayload {
    pub fn sale(sale: &SaleData, stage: Option<(&str, &str)>) -> Self {
        InteractionPayload::Sale {
            sale_value: sale.sale_value,
            product_id: sale.product_id.clone(),
            product_name: sale.product_name.clone(),
            quantity: sale.quantity,
            notes: sale.notes.clone(),
            new_stage_id: stage.map(|(id, _)| id.to_string()),
            new_stage: stage.map(|(_, name)| name.to_string()),
        }
    }

    pub fn to_metadata(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Lê o payload gravado; JSON inválido ou desconhecido vira `None`
    pub fn parse(metadata: Option<&str>) -> Option<Self> {
        let raw = metadata?;
        match serde_json::from_str(raw) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!("Metadata sem payload estruturado ({}): {}", e, raw);
                None
            }
        }
    }

    pub fn sale_value(&self) -> Option<f64> {
        match self {
            InteractionPayload::Sale { sale_value, .. } => Some(*sale_value),
            InteractionPayload::StageTransition { .. } => None,
        }
    }
}

/// Valor de venda de uma metadata qualquer
///
/// Aceita o payload estruturado e também o formato antigo `{ "saleValue": ... }`
/// (número ou texto numérico). Retorna `None` para metadata ilegível.
pub fn extract_sale_value(metadata: Option<&str>) -> Option<f64> {
    if let Some(payload) = InteractionPayload::parse(metadata) {
        return payload.sale_value();
    }

    let value: Value = serde_json::from_str(metadata?).ok()?;
    let parsed = match value.get("saleValue")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Linha da tabela `interactions`
#[derive(Debug, Clone, FromRow)]
pub struct Interaction {
    pub id: String,
    pub client_id: String,
    pub user_id: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub description: String,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Interação como devolvida pela API, com o payload já interpretado
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionView {
    pub id: String,
    pub client_id: String,
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub details: Option<InteractionPayload>,
    pub created_at: DateTime<Utc>,
}

impl From<Interaction> for InteractionView {
    fn from(row: Interaction) -> Self {
        let details = InteractionPayload::parse(row.metadata.as_deref());
        Self {
            id: row.id,
            client_id: row.client_id,
            user_id: row.user_id,
            kind: row.kind,
            description: row.description,
            details,
            created_at: row.created_at,
        }
    }
}

/// Corpo do POST de interação (caminho de registro manual)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub sale_data: Option<SaleData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale() -> SaleData {
        SaleData {
            product_id: "P1".to_string(),
            product_name: "Plano Pro".to_string(),
            quantity: 2,
            sale_value: 500.0,
            notes: None,
        }
    }

    #[test]
    fn test_sale_metadata_carries_flat_fields() {
        let payload = InteractionPayload::sale(&sale(), Some(("s3", "Fechado")));
        let json: Value = serde_json::from_str(&payload.to_metadata().unwrap()).unwrap();

        assert_eq!(json["kind"], "sale");
        assert_eq!(json["saleValue"], 500.0);
        assert_eq!(json["productId"], "P1");
        assert_eq!(json["productName"], "Plano Pro");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["newStage"], "Fechado");
    }

    #[test]
    fn test_transition_metadata_shape() {
        let payload = InteractionPayload::StageTransition {
            new_stage_id: "s2".to_string(),
            new_stage: "Negociação".to_string(),
            previous_stage_id: Some("s1".to_string()),
        };
        let json: Value = serde_json::from_str(&payload.to_metadata().unwrap()).unwrap();

        assert_eq!(json["kind"], "stageTransition");
        assert_eq!(json["newStageId"], "s2");
        assert_eq!(json["previousStageId"], "s1");
        assert_eq!(payload.sale_value(), None);
    }

    #[test]
    fn test_extract_sale_value_variants() {
        let structured = InteractionPayload::sale(&sale(), None).to_metadata().unwrap();
        assert_eq!(extract_sale_value(Some(&structured)), Some(500.0));
        assert_eq!(extract_sale_value(Some(r#"{"saleValue": 120.5}"#)), Some(120.5));
        assert_eq!(extract_sale_value(Some(r#"{"saleValue": "99,90"}"#)), Some(99.9));
        assert_eq!(extract_sale_value(Some("not json")), None);
        assert_eq!(extract_sale_value(Some(r#"{"newStage": "X"}"#)), None);
        assert_eq!(extract_sale_value(None), None);
    }
}
