use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use crate::models::{NewUser, User};

#[derive(Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find(&self, id: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY name COLLATE NOCASE")
            .fetch_all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn create(&self, input: NewUser) -> ServiceResult<User> {
        let name = input.name.trim();
        let email = input.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(ServiceError::Validation("Nome do usuário é obrigatório".to_string()));
        }
        if !email.contains('@') {
            return Err(ServiceError::Validation(format!("E-mail inválido: {}", email)));
        }

        let (taken,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(&email)
            .fetch_one(&self.db)
            .await?;
        if taken > 0 {
            return Err(ServiceError::Validation(format!("E-mail já cadastrado: {}", email)));
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email,
            role: input.role,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO users (id, name, email, role, created_at) VALUES (?, ?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .execute(&self.db)
            .await?;

        tracing::info!("👤 Usuário criado: {} ({})", user.email, user.role.as_str());
        Ok(user)
    }
}
