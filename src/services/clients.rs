//! Clientes e montagem do quadro do pipeline
//!
//! O filtro de visibilidade (VENDEDOR só vê os próprios clientes) é aplicado
//! aqui, na listagem e na busca do quadro.

use std::collections::HashMap;

use chrono::Utc;
use pipeline_client::{ClientCard, StageColumn};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::models::{Client, CurrentUser, NewClient, Stage};

#[derive(Clone)]
pub struct ClientService {
    db: SqlitePool,
}

impl ClientService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Clientes visíveis para o usuário, incluindo arquivados
    pub async fn list(&self, viewer: &CurrentUser) -> ServiceResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE (?1 IS NULL OR owner_id = ?1) ORDER BY name COLLATE NOCASE",
        )
        .bind(viewer.owner_filter())
        .fetch_all(&self.db)
        .await?;
        Ok(clients)
    }

    /// Busca um cliente; para VENDEDOR, clientes de outros vendedores são 404
    pub async fn get(&self, viewer: &CurrentUser, id: &str) -> ServiceResult<Client> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .filter(|c| match viewer.owner_filter() {
                Some(owner) => c.owner_id.as_deref() == Some(owner),
                None => true,
            });

        client.ok_or_else(|| ServiceError::NotFound(format!("Cliente não encontrado: {}", id)))
    }

    /// Cria o cliente na primeira etapa do funil
    pub async fn create(&self, viewer: &CurrentUser, input: NewClient) -> ServiceResult<Client> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Nome do cliente é obrigatório".to_string()));
        }
        if !input.potential_value.is_finite() || input.potential_value < 0.0 {
            return Err(ServiceError::Validation(
                "Valor potencial deve ser um número maior ou igual a zero".to_string(),
            ));
        }

        let owner_id = match input.owner_id.as_deref() {
            None => viewer.id.clone(),
            Some(owner) if owner == viewer.id => owner.to_string(),
            Some(_) if !viewer.is_manager() => {
                return Err(ServiceError::Forbidden(
                    "Apenas gestores podem atribuir clientes a outros vendedores".to_string(),
                ));
            }
            Some(owner) => {
                let (exists,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
                    .bind(owner)
                    .fetch_one(&self.db)
                    .await?;
                if exists == 0 {
                    return Err(ServiceError::Validation(format!("Responsável não encontrado: {}", owner)));
                }
                owner.to_string()
            }
        };

        let first_stage = sqlx::query_as::<_, Stage>("SELECT * FROM stages ORDER BY sort_order, created_at LIMIT 1")
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation("Nenhuma etapa configurada no pipeline".to_string())
            })?;

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            company: clean(input.company),
            email: clean(input.email),
            phone: clean(input.phone),
            potential_value: input.potential_value,
            stage_id: first_stage.id,
            owner_id: Some(owner_id),
            archived: false,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO clients (id, name, company, email, phone, potential_value, stage_id, owner_id, archived, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.company)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.potential_value)
        .bind(&client.stage_id)
        .bind(&client.owner_id)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.db)
        .await?;

        tracing::info!("➕ Cliente criado: '{}' na etapa '{}'", client.name, first_stage.name);
        Ok(client)
    }

    /// Arquiva (ou restaura) o cliente no pipeline
    pub async fn set_archived(&self, viewer: &CurrentUser, id: &str, archived: bool) -> ServiceResult<Client> {
        let mut client = self.get(viewer, id).await?;

        client.archived = archived;
        client.updated_at = Utc::now();
        sqlx::query("UPDATE clients SET archived = ?, updated_at = ? WHERE id = ?")
            .bind(client.archived)
            .bind(client.updated_at)
            .bind(&client.id)
            .execute(&self.db)
            .await?;

        Ok(client)
    }

    /// Etapas ordenadas com os clientes visíveis e não arquivados de cada uma
    pub async fn board(&self, viewer: &CurrentUser) -> ServiceResult<Vec<StageColumn>> {
        let stages = sqlx::query_as::<_, Stage>("SELECT * FROM stages ORDER BY sort_order, created_at")
            .fetch_all(&self.db)
            .await?;

        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE archived = 0 AND (?1 IS NULL OR owner_id = ?1) ORDER BY name COLLATE NOCASE",
        )
        .bind(viewer.owner_filter())
        .fetch_all(&self.db)
        .await?;

        let mut by_stage: HashMap<String, Vec<ClientCard>> = HashMap::new();
        for client in &clients {
            by_stage.entry(client.stage_id.clone()).or_default().push(client.to_card());
        }

        Ok(stages
            .into_iter()
            .map(|stage| {
                let cards = by_stage.remove(&stage.id).unwrap_or_default();
                stage.into_column(cards)
            })
            .collect())
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
