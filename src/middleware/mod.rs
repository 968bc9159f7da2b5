/// Middleware layer para o Axum router
///
/// - `require_session`: resolve o usuário do header `X-User-Id` (rotas /api)
/// - `require_admin_key`: protege os endpoints /admin/*

pub mod admin_auth;
pub mod session;

pub use admin_auth::require_admin_key;
pub use session::{require_manager, require_session};
