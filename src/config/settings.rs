use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub pipeline: PipelineSettings,
    pub reports: ReportSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineSettings {
    /// Tipo da interação gravada em movimentações comuns
    pub status_change_type: String,
    /// Tipos de interação que representam venda; o primeiro é usado pelo pipeline
    pub sale_types: Vec<String>,
    /// Cria as etapas padrão quando o banco não tem nenhuma
    pub seed_default_stages: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportSettings {
    /// Janela padrão quando `from` não é informado
    pub default_window_days: i64,
}

impl PipelineSettings {
    pub fn pipeline_sale_type(&self) -> &str {
        self.sale_types.first().map(String::as_str).unwrap_or("VENDA")
    }

    pub fn is_sale_type(&self, kind: &str) -> bool {
        self.sale_types.iter().any(|t| t.eq_ignore_ascii_case(kind))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseSettings {
                url: "sqlite://crm.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            pipeline: PipelineSettings {
                status_change_type: "STATUS_CHANGE".to_string(),
                sale_types: vec!["VENDA".to_string()],
                seed_default_stages: true,
            },
            reports: ReportSettings {
                default_window_days: 30,
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections as i64)?
            .set_default("pipeline.status_change_type", defaults.pipeline.status_change_type)?
            .set_default("pipeline.sale_types", defaults.pipeline.sale_types)?
            .set_default("pipeline.seed_default_stages", defaults.pipeline.seed_default_stages)?
            .set_default("reports.default_window_days", defaults.reports.default_window_days)?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente específicas
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", url)?;
        }

        builder = builder.add_source(
            Environment::with_prefix("CRM")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("pipeline.sale_types")
                .try_parsing(true),
        );

        let s = builder.build()?;

        s.try_deserialize()
    }
}
