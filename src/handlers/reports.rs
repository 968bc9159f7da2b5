use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::CurrentUser;
use crate::services::reports::SalesReport;
use crate::utils::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// `YYYY-MM-DD`, inclusivo
    pub from: Option<NaiveDate>,
    /// `YYYY-MM-DD`, inclusivo
    pub to: Option<NaiveDate>,
}

/// GET /api/reports/sales?from=&to=
pub async fn sales_report(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> AppResult<Json<SalesReport>> {
    let Query(query) = query?;
    let report = state.reports.sales_report(&user, query.from, query.to).await?;
    Ok(Json(report))
}
