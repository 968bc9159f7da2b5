/// Main Application: servidor do pipeline de vendas
///
/// Arquitetura:
/// - Quadro Kanban de clientes por etapa (GET /api/pipeline)
/// - Movimentação com registro de interação em transação única
/// - Etapa de fechamento exige dados de venda (capturados no cliente)
/// - Relatórios agregam a trilha de interações

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crm_pipeline::{config, db, routes, utils, AppState};

use config::Settings;
use utils::logging::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing (RUST_LOG controla o nível)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new().context("Failed to load settings")?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    // Banco de dados: conexão, esquema e etapas padrão
    let pool = db::connect(&settings.database)
        .await
        .map_err(|e| {
            log_database_error("connect", &e.to_string());
            e
        })
        .with_context(|| format!("Failed to open database {}", settings.database.url))?;
    let report = db::run_migrations(&pool)
        .await
        .context("Failed to apply database schema")?;
    log_info(&format!(
        "✅ Esquema aplicado: {}/{} statements",
        report.executed, report.total_statements
    ));

    if settings.pipeline.seed_default_stages {
        let created = db::seed_default_stages(&pool).await?;
        if created == 0 {
            tracing::debug!("Etapas já existentes, nada a criar");
        }
    }

    let app_state = Arc::new(AppState::new(settings.clone(), pool));
    let app = routes::build_router(app_state);

    // Iniciar servidor (PORT tem prioridade sobre a configuração)
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Falha ao instalar handler de Ctrl+C: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Falha ao instalar handler de SIGTERM: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
