//! Trilha de interações de cada cliente (somente inclusão)

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use super::clients::ClientService;
use super::error::{ServiceError, ServiceResult};
use super::pipeline::validate_sale_data;
use crate::config::settings::PipelineSettings;
use crate::models::{CurrentUser, Interaction, InteractionPayload, InteractionView, NewInteraction};
use crate::utils::logging::log_sale_registered;

#[derive(Clone)]
pub struct InteractionService {
    db: SqlitePool,
    clients: ClientService,
    settings: PipelineSettings,
}

impl InteractionService {
    pub fn new(db: SqlitePool, settings: PipelineSettings) -> Self {
        Self {
            clients: ClientService::new(db.clone()),
            db,
            settings,
        }
    }

    /// Histórico do cliente, mais recente primeiro
    pub async fn list_for_client(&self, viewer: &CurrentUser, client_id: &str) -> ServiceResult<Vec<InteractionView>> {
        let client = self.clients.get(viewer, client_id).await?;

        let rows = sqlx::query_as::<_, Interaction>(
            "SELECT * FROM interactions WHERE client_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(&client.id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InteractionView::from).collect())
    }

    /// Registro manual de interação; tipos de venda exigem `saleData`
    pub async fn log(&self, user: &CurrentUser, client_id: &str, input: NewInteraction) -> ServiceResult<InteractionView> {
        let client = self.clients.get(user, client_id).await?;

        let kind = input.kind.trim().to_uppercase();
        if kind.is_empty() {
            return Err(ServiceError::Validation("type é obrigatório".to_string()));
        }

        let is_sale = self.settings.is_sale_type(&kind);
        let sale = match input.sale_data {
            Some(sale) => Some(validate_sale_data(sale)?),
            None if is_sale => {
                return Err(ServiceError::Validation(format!(
                    "Interações do tipo {} exigem saleData",
                    kind
                )));
            }
            None => None,
        };

        let description = match (input.description.trim(), &sale) {
            ("", Some(sale)) => format!("Venda registrada: {} x{}", sale.product_name, sale.quantity),
            ("", None) => return Err(ServiceError::Validation("description é obrigatória".to_string())),
            (text, _) => text.to_string(),
        };

        let metadata = sale
            .as_ref()
            .map(|s| InteractionPayload::sale(s, None).to_metadata())
            .transpose()?;

        let interaction = Interaction {
            id: Uuid::new_v4().to_string(),
            client_id: client.id.clone(),
            user_id: Some(user.id.clone()),
            kind,
            description,
            metadata,
            created_at: Utc::now(),
        };
        insert_interaction(&self.db, &interaction).await?;

        if let (true, Some(sale)) = (is_sale, &sale) {
            log_sale_registered(&client.id, &sale.product_name, sale.sale_value);
        }
        Ok(InteractionView::from(interaction))
    }
}

/// Insere uma interação; funciona tanto no pool quanto dentro de transação
pub(crate) async fn insert_interaction<'c, E>(executor: E, interaction: &Interaction) -> ServiceResult<()>
where
    E: sqlx::Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO interactions (id, client_id, user_id, type, description, metadata, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&interaction.id)
    .bind(&interaction.client_id)
    .bind(&interaction.user_id)
    .bind(&interaction.kind)
    .bind(&interaction.description)
    .bind(&interaction.metadata)
    .bind(interaction.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::Role;
    use crate::services::test_support::*;
    use pipeline_client::SaleData;

    fn service(pool: &SqlitePool) -> InteractionService {
        InteractionService::new(pool.clone(), Settings::default().pipeline)
    }

    fn note(kind: &str, description: &str) -> NewInteraction {
        NewInteraction {
            kind: kind.to_string(),
            description: description.to_string(),
            sale_data: None,
        }
    }

    #[tokio::test]
    async fn test_log_and_list_newest_first() {
        let (pool, manager) = scenario_pool().await;
        let service = service(&pool);

        service.log(&manager, "C1", note("ligacao", "Primeiro contato")).await.unwrap();
        service.log(&manager, "C1", note("EMAIL", "Proposta enviada")).await.unwrap();

        let history = service.list_for_client(&manager, "C1").await.unwrap();
        let descriptions: Vec<_> = history.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Proposta enviada", "Primeiro contato"]);
        assert_eq!(history[1].kind, "LIGACAO");
        assert!(history[0].details.is_none());
    }

    #[tokio::test]
    async fn test_sale_type_requires_sale_data() {
        let (pool, manager) = scenario_pool().await;
        let service = service(&pool);

        let missing = service.log(&manager, "C1", note("venda", "Fechou")).await;
        assert!(matches!(missing, Err(ServiceError::Validation(_))));

        let mut input = note("VENDA", "");
        input.sale_data = Some(SaleData {
            product_id: "P1".to_string(),
            product_name: "Plano Pro".to_string(),
            quantity: 3,
            sale_value: 900.0,
            notes: None,
        });
        let logged = service.log(&manager, "C1", input).await.unwrap();

        assert_eq!(logged.description, "Venda registrada: Plano Pro x3");
        assert_eq!(logged.details.and_then(|d| d.sale_value()), Some(900.0));
    }

    #[tokio::test]
    async fn test_seller_cannot_touch_foreign_client() {
        let (pool, _manager) = scenario_pool().await;
        let seller = insert_user(&pool, "Ana", Role::Vendedor).await;
        let service = service(&pool);

        assert!(matches!(
            service.list_for_client(&seller, "C1").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.log(&seller, "C1", note("NOTA", "x")).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_audit_rows_cannot_be_edited() {
        let (pool, manager) = scenario_pool().await;
        let service = service(&pool);
        let logged = service.log(&manager, "C1", note("NOTA", "Original")).await.unwrap();

        let update = sqlx::query("UPDATE interactions SET description = 'Editado' WHERE id = ?")
            .bind(&logged.id)
            .execute(&pool)
            .await;
        assert!(update.is_err());
    }
}
