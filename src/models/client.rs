use chrono::{DateTime, Utc};
use pipeline_client::ClientCard;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cliente do CRM; pertence a exatamente uma etapa por vez
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub potential_value: f64,
    pub stage_id: String,
    pub owner_id: Option<String>,
    /// Arquivado do pipeline: some do quadro mas continua no dossiê
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn to_card(&self) -> ClientCard {
        ClientCard {
            id: self.id.clone(),
            name: self.name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            potential_value: self.potential_value,
            stage_id: self.stage_id.clone(),
            owner_id: self.owner_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub potential_value: f64,
    /// Só GESTOR pode atribuir a outro vendedor; padrão é o próprio usuário
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveRequest {
    pub archived: bool,
}
