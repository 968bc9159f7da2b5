use tracing::{info, warn, error, debug};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_client_moved(client_id: &str, stage_name: &str, interaction_type: &str) {
    info!("🔀 Cliente {} movido para '{}' (interação {})", client_id, stage_name, interaction_type);
}

pub fn log_sale_registered(client_id: &str, product_name: &str, sale_value: f64) {
    info!("💰 Venda registrada: cliente {} - produto '{}' - valor {:.2}", client_id, product_name, sale_value);
}

pub fn log_closing_stage_changed(stage_id: &str, stage_name: &str) {
    info!("🏁 Etapa de fechamento agora é '{}' ({})", stage_name, stage_id);
}

pub fn log_database_error(operation: &str, error: &str) {
    error!("Database error: {} - Error: {}", operation, error);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 CRM pipeline server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_access_denied(user_id: &str, action: &str) {
    warn!("⛔ Acesso negado: usuário {} tentou {}", user_id, action);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
