use chrono::{DateTime, Utc};
use pipeline_client::{ClientCard, StageColumn, StageSummary};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Etapa do funil
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    pub name: String,
    pub color: String,
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    pub is_closing: bool,
    pub created_at: DateTime<Utc>,
}

impl Stage {
    pub fn summary(&self) -> StageSummary {
        StageSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
            is_closing: self.is_closing,
        }
    }

    pub fn into_column(self, clients: Vec<ClientCard>) -> StageColumn {
        StageColumn {
            id: self.id,
            name: self.name,
            color: self.color,
            order: self.order,
            is_closing: self.is_closing,
            clients,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStage {
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub is_closing: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub is_closing: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageReorder {
    pub stage_ids: Vec<String>,
}
