//! Relatório de vendas sobre a trilha de interações
//!
//! Só leitura. As linhas de venda são filtradas pela janela e pelos tipos de
//! venda configurados; metadata ilegível é ignorada com um aviso.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::error::{ServiceError, ServiceResult};
use crate::config::settings::{PipelineSettings, ReportSettings};
use crate::models::{extract_sale_value, Client, CurrentUser, Stage};

/// Interação candidata a venda, já com os nomes de cliente e vendedor
#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub total_value: f64,
    pub sales_count: usize,
    pub average_ticket: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub id: String,
    pub name: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub stage_id: String,
    pub name: String,
    pub color: String,
    pub client_count: usize,
    pub potential_value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub total: f64,
    pub count: usize,
}

/// Resultado da agregação pura sobre as linhas de venda
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesAggregate {
    pub totals: SalesTotals,
    pub by_seller: Vec<RankingEntry>,
    pub by_client: Vec<RankingEntry>,
    pub timeline: Vec<TimelinePoint>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub totals: SalesTotals,
    pub by_seller: Vec<RankingEntry>,
    pub by_client: Vec<RankingEntry>,
    pub funnel: Vec<FunnelStage>,
    pub timeline: Vec<TimelinePoint>,
    pub skipped_rows: usize,
}

const NO_SELLER: &str = "Sem responsável";

/// Soma as vendas da janela `[from, until)` por vendedor, cliente e dia
pub fn aggregate_sales<F>(rows: &[SaleRow], is_sale_type: F, from: DateTime<Utc>, until: DateTime<Utc>) -> SalesAggregate
where
    F: Fn(&str) -> bool,
{
    let mut aggregate = SalesAggregate::default();
    let mut sellers: HashMap<String, RankingEntry> = HashMap::new();
    let mut clients: HashMap<String, RankingEntry> = HashMap::new();
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for row in rows {
        if row.created_at < from || row.created_at >= until || !is_sale_type(&row.kind) {
            continue;
        }

        let Some(value) = extract_sale_value(row.metadata.as_deref()) else {
            tracing::warn!("⚠️ Interação {} ignorada no relatório: metadata sem valor de venda", row.id);
            aggregate.skipped_rows += 1;
            continue;
        };

        aggregate.totals.total_value += value;
        aggregate.totals.sales_count += 1;

        let seller_id = row.user_id.clone().unwrap_or_default();
        let seller_name = row.user_name.clone().unwrap_or_else(|| NO_SELLER.to_string());
        accumulate(&mut sellers, seller_id, seller_name, value);
        accumulate(&mut clients, row.client_id.clone(), row.client_name.clone(), value);

        let day = days.entry(row.created_at.date_naive()).or_insert((0.0, 0));
        day.0 += value;
        day.1 += 1;
    }

    if aggregate.totals.sales_count > 0 {
        aggregate.totals.average_ticket = aggregate.totals.total_value / aggregate.totals.sales_count as f64;
    }
    aggregate.by_seller = ranking(sellers);
    aggregate.by_client = ranking(clients);
    aggregate.timeline = days
        .into_iter()
        .map(|(date, (total, count))| TimelinePoint { date, total, count })
        .collect();

    aggregate
}

/// Contagem e valor potencial por etapa, na ordem do funil
pub fn build_funnel(stages: &[Stage], clients: &[Client]) -> Vec<FunnelStage> {
    stages
        .iter()
        .map(|stage| {
            let in_stage = clients
                .iter()
                .filter(|c| !c.archived && c.stage_id == stage.id);
            let (client_count, potential_value) =
                in_stage.fold((0, 0.0), |(n, sum), c| (n + 1, sum + c.potential_value));

            FunnelStage {
                stage_id: stage.id.clone(),
                name: stage.name.clone(),
                color: stage.color.clone(),
                client_count,
                potential_value,
            }
        })
        .collect()
}

/// Janela efetiva: `to` padrão é hoje, `from` padrão é `to` menos `window_days`
pub fn resolve_period(window_days: i64, from: Option<NaiveDate>, to: Option<NaiveDate>) -> ServiceResult<ReportPeriod> {
    let to = to.unwrap_or_else(|| Utc::now().date_naive());
    let from = match from {
        Some(from) => from,
        None => to
            .checked_sub_signed(Duration::days(window_days.max(0)))
            .ok_or_else(|| out_of_range(to))?,
    };
    if from > to {
        return Err(ServiceError::Validation(format!(
            "Período inválido: {} é posterior a {}",
            from, to
        )));
    }
    Ok(ReportPeriod { from, to })
}

fn out_of_range(date: NaiveDate) -> ServiceError {
    ServiceError::Validation(format!("Data fora do intervalo suportado: {}", date))
}

fn accumulate(map: &mut HashMap<String, RankingEntry>, id: String, name: String, value: f64) {
    let entry = map.entry(id.clone()).or_insert(RankingEntry {
        id,
        name,
        total: 0.0,
        count: 0,
    });
    entry.total += value;
    entry.count += 1;
}

fn ranking(map: HashMap<String, RankingEntry>) -> Vec<RankingEntry> {
    let mut entries: Vec<_> = map.into_values().collect();
    entries.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    entries
}

#[derive(Clone)]
pub struct ReportService {
    db: SqlitePool,
    pipeline: PipelineSettings,
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(db: SqlitePool, pipeline: PipelineSettings, settings: ReportSettings) -> Self {
        Self { db, pipeline, settings }
    }

    pub async fn sales_report(
        &self,
        viewer: &CurrentUser,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<SalesReport> {
        let period = resolve_period(self.settings.default_window_days, from, to)?;
        let start = period.from.and_time(chrono::NaiveTime::MIN).and_utc();
        let until = period
            .to
            .checked_add_signed(Duration::days(1))
            .ok_or_else(|| out_of_range(period.to))?
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();

        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT i.id, i.client_id, c.name AS client_name, i.user_id, u.name AS user_name, \
                    i.type, i.metadata, i.created_at \
             FROM interactions i \
             JOIN clients c ON c.id = i.client_id \
             LEFT JOIN users u ON u.id = i.user_id \
             WHERE i.created_at >= ?2 AND i.created_at < ?3 \
               AND (?1 IS NULL OR i.user_id = ?1) \
             ORDER BY i.created_at",
        )
        .bind(viewer.owner_filter())
        .bind(start)
        .bind(until)
        .fetch_all(&self.db)
        .await?;

        let aggregate = aggregate_sales(&rows, |kind| self.pipeline.is_sale_type(kind), start, until);

        let stages = sqlx::query_as::<_, Stage>("SELECT * FROM stages ORDER BY sort_order, created_at")
            .fetch_all(&self.db)
            .await?;
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE archived = 0 AND (?1 IS NULL OR owner_id = ?1)",
        )
        .bind(viewer.owner_filter())
        .fetch_all(&self.db)
        .await?;

        tracing::info!(
            "📊 Relatório de vendas {}..{}: {} venda(s), {} linha(s) ignorada(s)",
            period.from,
            period.to,
            aggregate.totals.sales_count,
            aggregate.skipped_rows
        );

        Ok(SalesReport {
            period,
            totals: aggregate.totals,
            by_seller: aggregate.by_seller,
            by_client: aggregate.by_client,
            funnel: build_funnel(&stages, &clients),
            timeline: aggregate.timeline,
            skipped_rows: aggregate.skipped_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::Role;
    use crate::services::pipeline::PipelineService;
    use crate::services::test_support::*;
    use chrono::TimeZone;
    use pipeline_client::{MoveRequest, SaleData};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn row(id: &str, kind: &str, seller: Option<(&str, &str)>, client: (&str, &str), metadata: &str, when: DateTime<Utc>) -> SaleRow {
        SaleRow {
            id: id.to_string(),
            client_id: client.0.to_string(),
            client_name: client.1.to_string(),
            user_id: seller.map(|s| s.0.to_string()),
            user_name: seller.map(|s| s.1.to_string()),
            kind: kind.to_string(),
            metadata: Some(metadata.to_string()),
            created_at: when,
        }
    }

    fn is_venda(kind: &str) -> bool {
        kind.eq_ignore_ascii_case("VENDA")
    }

    #[test]
    fn test_aggregate_rankings_and_timeline() {
        let ana = Some(("u1", "Ana"));
        let bia = Some(("u2", "Bia"));
        let rows = vec![
            row("1", "VENDA", ana, ("c1", "ACME"), r#"{"saleValue": 100}"#, at(1, 10)),
            row("2", "venda", bia, ("c2", "Beta"), r#"{"saleValue": "300"}"#, at(1, 15)),
            row("3", "VENDA", ana, ("c2", "Beta"), r#"{"kind":"sale","saleValue":250,"productId":"P","productName":"P","quantity":1}"#, at(2, 9)),
            row("4", "STATUS_CHANGE", ana, ("c1", "ACME"), r#"{"saleValue": 999}"#, at(2, 9)),
            row("5", "VENDA", bia, ("c1", "ACME"), "corrompido", at(2, 11)),
            row("6", "VENDA", None, ("c1", "ACME"), r#"{"saleValue": 50}"#, at(3, 8)),
            row("7", "VENDA", ana, ("c1", "ACME"), r#"{"saleValue": 1000}"#, at(9, 8)),
        ];

        let result = aggregate_sales(&rows, is_venda, at(1, 0), at(4, 0));

        assert_eq!(result.totals.sales_count, 4);
        assert_eq!(result.totals.total_value, 700.0);
        assert_eq!(result.totals.average_ticket, 175.0);
        assert_eq!(result.skipped_rows, 1);

        let sellers: Vec<_> = result.by_seller.iter().map(|e| (e.name.as_str(), e.total)).collect();
        assert_eq!(sellers, vec![("Ana", 350.0), ("Bia", 300.0), (NO_SELLER, 50.0)]);

        let clients: Vec<_> = result.by_client.iter().map(|e| (e.id.as_str(), e.total, e.count)).collect();
        assert_eq!(clients, vec![("c2", 550.0, 2), ("c1", 150.0, 2)]);

        let days: Vec<_> = result.timeline.iter().map(|p| (p.date.to_string(), p.total)).collect();
        assert_eq!(
            days,
            vec![
                ("2024-03-01".to_string(), 400.0),
                ("2024-03-02".to_string(), 250.0),
                ("2024-03-03".to_string(), 50.0),
            ]
        );
    }

    #[test]
    fn test_aggregate_empty_window() {
        let result = aggregate_sales(&[], is_venda, at(1, 0), at(2, 0));
        assert_eq!(result, SalesAggregate::default());
    }

    #[test]
    fn test_resolve_period_defaults_and_validation() {
        let to = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let period = resolve_period(30, None, Some(to)).unwrap();
        assert_eq!(period.from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let from = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert!(matches!(
            resolve_period(30, Some(from), Some(to)),
            Err(ServiceError::Validation(_))
        ));

        assert!(matches!(
            resolve_period(30, None, Some(NaiveDate::MIN)),
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_sales_report_rejects_last_representable_day() {
        let (pool, manager) = scenario_pool().await;
        let settings = Settings::default();
        let reports = ReportService::new(pool, settings.pipeline, settings.reports);

        let result = reports.sales_report(&manager, None, Some(NaiveDate::MAX)).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sales_report_window_applies_to_stored_rows() {
        let (pool, manager) = scenario_pool().await;
        let settings = Settings::default();
        let old_sale = crate::models::Interaction {
            id: "old-sale".to_string(),
            client_id: "C1".to_string(),
            user_id: Some(manager.id.clone()),
            kind: "VENDA".to_string(),
            description: "Venda antiga".to_string(),
            metadata: Some(r#"{"saleValue": 120}"#.to_string()),
            created_at: Utc.with_ymd_and_hms(2020, 6, 15, 12, 0, 0).unwrap(),
        };
        crate::services::interactions::insert_interaction(&pool, &old_sale).await.unwrap();
        let reports = ReportService::new(pool, settings.pipeline, settings.reports);

        let recent = reports.sales_report(&manager, None, None).await.unwrap();
        assert_eq!(recent.totals.sales_count, 0);

        let june = reports
            .sales_report(
                &manager,
                NaiveDate::from_ymd_opt(2020, 6, 1),
                NaiveDate::from_ymd_opt(2020, 6, 15),
            )
            .await
            .unwrap();
        assert_eq!(june.totals.total_value, 120.0);
        assert_eq!(june.timeline.len(), 1);
    }

    #[tokio::test]
    async fn test_sales_report_end_to_end() {
        let (pool, manager) = scenario_pool().await;
        let seller = insert_user(&pool, "Ana", Role::Vendedor).await;
        insert_client(&pool, "C2", "Cliente Dois", "s1", Some(seller.id.as_str())).await;
        let settings = Settings::default();
        let pipeline = PipelineService::new(pool.clone(), settings.pipeline.clone());

        for (who, client, value) in [(&manager, "C1", 500.0), (&seller, "C2", 200.0)] {
            pipeline
                .move_client(
                    who,
                    MoveRequest {
                        client_id: client.to_string(),
                        new_stage_id: "s3".to_string(),
                        sale_data: Some(SaleData {
                            product_id: "P1".to_string(),
                            product_name: "Plano Pro".to_string(),
                            quantity: 1,
                            sale_value: value,
                            notes: None,
                        }),
                    },
                )
                .await
                .unwrap();
        }

        let reports = ReportService::new(pool, settings.pipeline, settings.reports);

        let full = reports.sales_report(&manager, None, None).await.unwrap();
        assert_eq!(full.totals.total_value, 700.0);
        assert_eq!(full.by_seller[0].name, "Gestora");
        let closed = full.funnel.iter().find(|f| f.stage_id == "s3").unwrap();
        assert_eq!(closed.client_count, 2);

        let own = reports.sales_report(&seller, None, None).await.unwrap();
        assert_eq!(own.totals.total_value, 200.0);
        assert_eq!(own.by_client.len(), 1);
        assert_eq!(own.funnel.iter().map(|f| f.client_count).sum::<usize>(), 1);
    }
}
