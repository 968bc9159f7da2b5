//! Usuários e papéis
//!
//! - GESTOR: vê todos os clientes e configura etapas/produtos
//! - VENDEDOR: vê apenas os clientes que são seus

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Gestor,
    Vendedor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Gestor => "GESTOR",
            Role::Vendedor => "VENDEDOR",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase().as_str() {
            "GESTOR" => Ok(Role::Gestor),
            "VENDEDOR" => Ok(Role::Vendedor),
            other => Err(format!("Papel desconhecido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Usuário da sessão, resolvido pelo middleware a partir do header `X-User-Id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Gestor
    }

    /// Filtro de visibilidade: VENDEDOR só enxerga os próprios clientes
    pub fn owner_filter(&self) -> Option<&str> {
        match self.role {
            Role::Gestor => None,
            Role::Vendedor => Some(self.id.as_str()),
        }
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}
