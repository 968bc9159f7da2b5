//! Movimentação de clientes entre etapas
//!
//! Única autoridade para efetivar uma transição: a troca de etapa do cliente
//! e a linha de interação correspondente são gravadas na mesma transação.
//! Não há idempotência: cada chamada gera uma nova interação.

use chrono::Utc;
use pipeline_client::{MoveRequest, MovedClient, SaleData};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::interactions::insert_interaction;
use crate::config::settings::PipelineSettings;
use crate::models::{Client, CurrentUser, Interaction, InteractionPayload, Stage};
use crate::utils::logging::{log_client_moved, log_sale_registered};

#[derive(Clone)]
pub struct PipelineService {
    db: SqlitePool,
    settings: PipelineSettings,
}

impl PipelineService {
    pub fn new(db: SqlitePool, settings: PipelineSettings) -> Self {
        Self { db, settings }
    }

    /// Move o cliente para a etapa de destino, registrando a interação
    ///
    /// Com `saleData` a interação é do tipo de venda configurado e carrega o
    /// payload da venda; sem ela, é uma mudança de status simples.
    pub async fn move_client(&self, user: &CurrentUser, request: MoveRequest) -> ServiceResult<MovedClient> {
        let client_id = request.client_id.trim();
        let stage_id = request.new_stage_id.trim();
        if client_id.is_empty() || stage_id.is_empty() {
            return Err(ServiceError::Validation(
                "clientId e newStageId são obrigatórios".to_string(),
            ));
        }
        let sale = request.sale_data.map(validate_sale_data).transpose()?;

        let mut tx = self.db.begin().await?;

        let mut client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = ?")
            .bind(client_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Cliente não encontrado: {}", client_id)))?;

        let stage = sqlx::query_as::<_, Stage>("SELECT * FROM stages WHERE id = ?")
            .bind(stage_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Etapa não encontrada: {}", stage_id)))?;

        let previous_stage_id = std::mem::replace(&mut client.stage_id, stage.id.clone());
        client.updated_at = Utc::now();

        sqlx::query("UPDATE clients SET stage_id = ?, updated_at = ? WHERE id = ?")
            .bind(&client.stage_id)
            .bind(client.updated_at)
            .bind(&client.id)
            .execute(&mut *tx)
            .await?;

        let (kind, description, payload) = match &sale {
            Some(sale) => (
                self.settings.pipeline_sale_type().to_string(),
                format!(
                    "Venda registrada: {} x{} - movido para {}",
                    sale.product_name, sale.quantity, stage.name
                ),
                InteractionPayload::sale(sale, Some((&stage.id, &stage.name))),
            ),
            None => (
                self.settings.status_change_type.clone(),
                format!("Status alterado para {}", stage.name),
                InteractionPayload::StageTransition {
                    new_stage_id: stage.id.clone(),
                    new_stage: stage.name.clone(),
                    previous_stage_id: Some(previous_stage_id),
                },
            ),
        };

        let interaction = Interaction {
            id: Uuid::new_v4().to_string(),
            client_id: client.id.clone(),
            user_id: Some(user.id.clone()),
            kind,
            description,
            metadata: Some(payload.to_metadata()?),
            created_at: client.updated_at,
        };
        insert_interaction(&mut *tx, &interaction).await?;

        tx.commit().await?;

        log_client_moved(&client.id, &stage.name, &interaction.kind);
        if let Some(sale) = &sale {
            log_sale_registered(&client.id, &sale.product_name, sale.sale_value);
        }

        Ok(MovedClient {
            card: client.to_card(),
            stage: stage.summary(),
        })
    }
}

/// Valida e normaliza os dados de venda recebidos
pub(crate) fn validate_sale_data(mut sale: SaleData) -> ServiceResult<SaleData> {
    sale.product_id = sale.product_id.trim().to_string();
    sale.product_name = sale.product_name.trim().to_string();
    sale.notes = sale
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    if sale.product_id.is_empty() {
        return Err(ServiceError::Validation("saleData.productId é obrigatório".to_string()));
    }
    if sale.product_name.is_empty() {
        sale.product_name = sale.product_id.clone();
    }
    if sale.quantity < 1 {
        return Err(ServiceError::Validation("saleData.quantity deve ser pelo menos 1".to_string()));
    }
    if !sale.sale_value.is_finite() || sale.sale_value <= 0.0 {
        return Err(ServiceError::Validation("saleData.saleValue deve ser maior que zero".to_string()));
    }
    Ok(sale)
}
