//! Conexão com o banco e aplicação do esquema
//!
//! O esquema fica embutido no binário (`migrations/*.sql`) e é aplicado na
//! inicialização, statement por statement. Todas as instruções são
//! idempotentes (`IF NOT EXISTS`).

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::config::settings::DatabaseSettings;

const SCHEMA_SQL: &str = include_str!("../../migrations/001_crm_schema.sql");

/// Etapas criadas em um banco vazio: (nome, cor, fechamento)
const DEFAULT_STAGES: &[(&str, &str, bool)] = &[
    ("Prospecção", "#3b82f6", false),
    ("Qualificação", "#8b5cf6", false),
    ("Negociação", "#f59e0b", false),
    ("Fechado", "#10b981", true),
];

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub total_statements: usize,
    pub executed: usize,
}

pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .connect_with(options)
        .await
}

/// Banco em memória com uma única conexão (cada conexão `:memory:` é um banco novo)
pub async fn connect_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Divide SQL em statements respeitando blocos BEGIN ... END de triggers
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_block = false;

    for line in sql.lines() {
        let trimmed = line.trim();

        // Ignorar comentários standalone e linhas vazias
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        current.push_str(line);
        current.push('\n');

        let upper = trimmed.to_ascii_uppercase();
        if !in_block && upper.ends_with("BEGIN") {
            in_block = true;
            continue;
        }

        if in_block {
            if upper.starts_with("END") && upper.ends_with(';') {
                in_block = false;
                statements.push(current.trim().to_string());
                current.clear();
            }
            continue;
        }

        if trimmed.ends_with(';') {
            statements.push(current.trim().to_string());
            current.clear();
        }
    }

    // Se sobrou algo no buffer
    if !current.trim().is_empty() {
        statements.push(current.trim().to_string());
    }

    statements
}

/// Aplica o esquema embutido; qualquer falha interrompe a inicialização
pub async fn run_migrations(pool: &SqlitePool) -> Result<MigrationReport, sqlx::Error> {
    let statements = split_sql_statements(SCHEMA_SQL);
    let mut report = MigrationReport {
        total_statements: statements.len(),
        executed: 0,
    };

    for (idx, statement) in statements.iter().enumerate() {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            tracing::error!("❌ Statement {}/{} falhou: {}", idx + 1, report.total_statements, e);
            e
        })?;
        report.executed += 1;
        tracing::debug!("✅ Statement {}/{} executed", idx + 1, report.total_statements);
    }

    Ok(report)
}

/// Cria as etapas padrão se a tabela estiver vazia; retorna quantas foram criadas
pub async fn seed_default_stages(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stages")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for (order, (name, color, is_closing)) in DEFAULT_STAGES.iter().enumerate() {
        sqlx::query(
            "INSERT INTO stages (id, name, color, sort_order, is_closing, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(*name)
        .bind(*color)
        .bind(order as i64)
        .bind(*is_closing)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!("🌱 {} etapas padrão criadas", DEFAULT_STAGES.len());
    Ok(DEFAULT_STAGES.len())
}
