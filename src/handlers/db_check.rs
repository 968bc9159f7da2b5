use axum::{extract::State, response::Json};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::utils::logging::log_warning;
use crate::utils::AppResult;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSummary {
    pub users: i64,
    pub stages: i64,
    pub closing_stages: i64,
    pub clients: i64,
    pub archived_clients: i64,
    pub products: i64,
    pub interactions: i64,
}

/// GET /admin/db-check - Verifica o estado do banco de dados
pub async fn check_database(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let pool = &state.db;

    let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users").fetch_one(pool).await?;

    let (stages, closing_stages): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) as total,
            COUNT(CASE WHEN is_closing = 1 THEN 1 END) as closing
        FROM stages
        "#,
    )
    .fetch_one(pool)
    .await?;

    let (clients, archived_clients): (i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) as total,
            COUNT(CASE WHEN archived = 1 THEN 1 END) as archived
        FROM clients
        "#,
    )
    .fetch_one(pool)
    .await?;

    let (products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
    let (interactions,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM interactions").fetch_one(pool).await?;

    let summary = DatabaseSummary {
        users,
        stages,
        closing_stages,
        clients,
        archived_clients,
        products,
        interactions,
    };

    // Mais de uma etapa de fechamento indica dado corrompido fora da API
    let healthy = summary.closing_stages <= 1;
    if !healthy {
        log_warning(&format!("⚠️ {} etapas marcadas como fechamento", summary.closing_stages));
    }

    Ok(Json(json!({
        "status": if healthy { "ok" } else { "inconsistent" },
        "summary": summary,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
