//! Montagem do router HTTP
//!
//! - públicas: /health, /ready
//! - /api/*: exigem sessão (`X-User-Id`)
//! - /admin/*: exigem `X-Admin-Key`

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::*;
use crate::middleware::{require_admin_key, require_session};
use crate::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/pipeline", get(get_board))
        .route("/api/pipeline/move", post(move_client))
        .route("/api/stages", get(list_stages).post(create_stage))
        .route("/api/stages/reorder", put(reorder_stages))
        .route("/api/stages/:id", put(update_stage).delete(delete_stage))
        .route("/api/stages/:id/closing", put(set_closing_stage))
        .route("/api/clients", get(list_clients).post(create_client))
        .route("/api/clients/:id", get(get_client))
        .route("/api/clients/:id/archive", put(archive_client))
        .route("/api/clients/:id/interactions", get(list_interactions).post(log_interaction))
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/reports/sales", get(sales_report))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session))
        .with_state(state.clone());

    // ✅ Rotas administrativas protegidas com API key
    let admin_routes = Router::new()
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/db-check", get(check_database))
        .layer(middleware::from_fn(require_admin_key))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .with_state(state)
        .merge(api_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
