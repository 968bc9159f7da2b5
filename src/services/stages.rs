//! Configuração das etapas do funil
//!
//! Regra principal: no máximo uma etapa de fechamento. Sempre que uma etapa
//! passa a ser de fechamento, a flag é removida das demais na mesma transação.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::models::{NewStage, Stage, StageReorder, StageUpdate};
use crate::utils::logging::log_closing_stage_changed;

const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Clone)]
pub struct StageService {
    db: SqlitePool,
}

impl StageService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Stage>> {
        let stages = sqlx::query_as::<_, Stage>("SELECT * FROM stages ORDER BY sort_order, created_at")
            .fetch_all(&self.db)
            .await?;
        Ok(stages)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Stage> {
        sqlx::query_as::<_, Stage>("SELECT * FROM stages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Etapa não encontrada: {}", id)))
    }

    pub async fn create(&self, input: NewStage) -> ServiceResult<Stage> {
        let name = validate_name(&input.name)?;
        let color = validate_color(input.color.as_deref())?;

        let mut tx = self.db.begin().await?;

        let (next_order,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(sort_order), -1) + 1 FROM stages")
            .fetch_one(&mut *tx)
            .await?;

        let stage = Stage {
            id: Uuid::new_v4().to_string(),
            name,
            color,
            order: next_order,
            is_closing: input.is_closing,
            created_at: Utc::now(),
        };

        if stage.is_closing {
            clear_closing_flags(&mut tx, &stage.id).await?;
        }

        sqlx::query(
            "INSERT INTO stages (id, name, color, sort_order, is_closing, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&stage.id)
        .bind(&stage.name)
        .bind(&stage.color)
        .bind(stage.order)
        .bind(stage.is_closing)
        .bind(stage.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("➕ Etapa criada: '{}' (ordem {})", stage.name, stage.order);
        if stage.is_closing {
            log_closing_stage_changed(&stage.id, &stage.name);
        }
        Ok(stage)
    }

    pub async fn update(&self, id: &str, input: StageUpdate) -> ServiceResult<Stage> {
        let mut stage = self.get(id).await?;

        if let Some(name) = &input.name {
            stage.name = validate_name(name)?;
        }
        if input.color.is_some() {
            stage.color = validate_color(input.color.as_deref())?;
        }
        let becomes_closing = input.is_closing == Some(true) && !stage.is_closing;
        if let Some(is_closing) = input.is_closing {
            stage.is_closing = is_closing;
        }

        let mut tx = self.db.begin().await?;
        if stage.is_closing {
            clear_closing_flags(&mut tx, &stage.id).await?;
        }
        sqlx::query("UPDATE stages SET name = ?, color = ?, is_closing = ? WHERE id = ?")
            .bind(&stage.name)
            .bind(&stage.color)
            .bind(stage.is_closing)
            .bind(&stage.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        if becomes_closing {
            log_closing_stage_changed(&stage.id, &stage.name);
        }
        Ok(stage)
    }

    /// Marca a etapa como a única de fechamento
    pub async fn set_closing(&self, id: &str) -> ServiceResult<Stage> {
        self.update(
            id,
            StageUpdate {
                is_closing: Some(true),
                ..StageUpdate::default()
            },
        )
        .await
    }

    /// Remove a etapa; recusa se ainda houver clientes nela (inclusive arquivados)
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let stage = self.get(id).await?;

        let (clients,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients WHERE stage_id = ?")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        if clients > 0 {
            return Err(ServiceError::Validation(format!(
                "A etapa '{}' possui {} cliente(s); mova-os antes de excluir",
                stage.name, clients
            )));
        }

        sqlx::query("DELETE FROM stages WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!("🗑️ Etapa removida: '{}'", stage.name);
        Ok(())
    }

    /// Reordena as etapas; a lista precisa conter cada etapa exatamente uma vez
    pub async fn reorder(&self, input: StageReorder) -> ServiceResult<Vec<Stage>> {
        let current = self.list().await?;
        let existing: HashSet<&str> = current.iter().map(|s| s.id.as_str()).collect();
        let requested: HashSet<&str> = input.stage_ids.iter().map(String::as_str).collect();

        if requested.len() != input.stage_ids.len() || requested != existing {
            return Err(ServiceError::Validation(
                "stageIds deve conter cada etapa exatamente uma vez".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        for (order, id) in input.stage_ids.iter().enumerate() {
            sqlx::query("UPDATE stages SET sort_order = ? WHERE id = ?")
                .bind(order as i64)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        self.list().await
    }
}

async fn clear_closing_flags(tx: &mut Transaction<'_, Sqlite>, keep_id: &str) -> ServiceResult<()> {
    sqlx::query("UPDATE stages SET is_closing = 0 WHERE id <> ? AND is_closing = 1")
        .bind(keep_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Nome da etapa é obrigatório".to_string()));
    }
    Ok(name.to_string())
}

fn validate_color(color: Option<&str>) -> ServiceResult<String> {
    let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(DEFAULT_COLOR.to_string());
    };

    let hex = color.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(ServiceError::Validation(format!("Cor inválida: {}", color)));
    }
    Ok(color.to_lowercase())
}
