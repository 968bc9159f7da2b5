use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use pipeline_client::Product;
use serde::Deserialize;
use std::sync::Arc;

use crate::middleware::require_manager;
use crate::models::{CurrentUser, NewProduct, ProductRecord};
use crate::utils::AppResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
}

/// GET /api/products?q= - catálogo para o diálogo de venda
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products.list(query.q.as_deref()).await?;
    Ok(Json(products.iter().map(ProductRecord::to_product).collect()))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    require_manager(&user, "cadastrar produtos")?;
    let Json(input) = payload?;

    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product.to_product())))
}
