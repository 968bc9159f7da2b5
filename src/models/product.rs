use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    pub price: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn to_product(&self) -> pipeline_client::Product {
        pipeline_client::Product {
            id: self.id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
            price: self.price,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub code: Option<String>,
    #[serde(default)]
    pub price: f64,
}
