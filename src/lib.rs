// Biblioteca do servidor do pipeline de vendas
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use sqlx::SqlitePool;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub db: SqlitePool,
    pub users: services::UserService,
    pub stages: services::StageService,
    pub clients: services::ClientService,
    pub pipeline: services::PipelineService,
    pub interactions: services::InteractionService,
    pub products: services::ProductService,
    pub reports: services::ReportService,
}

impl AppState {
    pub fn new(settings: config::Settings, db: SqlitePool) -> Self {
        Self {
            users: services::UserService::new(db.clone()),
            stages: services::StageService::new(db.clone()),
            clients: services::ClientService::new(db.clone()),
            pipeline: services::PipelineService::new(db.clone(), settings.pipeline.clone()),
            interactions: services::InteractionService::new(db.clone(), settings.pipeline.clone()),
            products: services::ProductService::new(db.clone()),
            reports: services::ReportService::new(db.clone(), settings.pipeline.clone(), settings.reports.clone()),
            settings,
            db,
        }
    }
}
