use chrono::Utc;
use pipeline_client::search::matches_product;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::models::{NewProduct, ProductRecord};

#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

impl ProductService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Catálogo ativo, filtrado por nome ou código com a mesma regra do diálogo de venda
    pub async fn list(&self, query: Option<&str>) -> ServiceResult<Vec<ProductRecord>> {
        let products = sqlx::query_as::<_, ProductRecord>(
            "SELECT * FROM products WHERE active = 1 ORDER BY name COLLATE NOCASE",
        )
        .fetch_all(&self.db)
        .await?;

        let query = query.unwrap_or("");
        Ok(products
            .into_iter()
            .filter(|p| matches_product(&p.name, p.code.as_deref(), query))
            .collect())
    }

    pub async fn create(&self, input: NewProduct) -> ServiceResult<ProductRecord> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Nome do produto é obrigatório".to_string()));
        }
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(ServiceError::Validation("Preço deve ser maior ou igual a zero".to_string()));
        }

        let product = ProductRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            code: input
                .code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            price: input.price,
            active: true,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO products (id, name, code, price, active, created_at) VALUES (?, ?, ?, ?, 1, ?)")
            .bind(&product.id)
            .bind(&product.name)
            .bind(&product.code)
            .bind(product.price)
            .bind(product.created_at)
            .execute(&self.db)
            .await?;

        tracing::info!("📦 Produto cadastrado: '{}'", product.name);
        Ok(product)
    }
}
