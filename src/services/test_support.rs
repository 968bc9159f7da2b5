//! Fixtures compartilhadas pelos testes dos serviços e handlers

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;
use crate::models::{CurrentUser, Role};

pub async fn migrated_pool() -> SqlitePool {
    let pool = db::connect_memory().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    pool
}

pub async fn insert_user(pool: &SqlitePool, name: &str, role: Role) -> CurrentUser {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO users (id, name, email, role, created_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(format!("{}@empresa.com", name.to_lowercase()))
        .bind(role.as_str())
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();

    CurrentUser {
        id,
        name: name.to_string(),
        role,
    }
}

pub async fn insert_stage(pool: &SqlitePool, id: &str, name: &str, order: i64, is_closing: bool) {
    sqlx::query("INSERT INTO stages (id, name, color, sort_order, is_closing, created_at) VALUES (?, ?, '#3b82f6', ?, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(order)
        .bind(is_closing)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_client(pool: &SqlitePool, id: &str, name: &str, stage_id: &str, owner_id: Option<&str>) {
    let now = Utc::now();
    sqlx::query("INSERT INTO clients (id, name, potential_value, stage_id, owner_id, archived, created_at, updated_at) VALUES (?, ?, 1000, ?, ?, 0, ?, ?)")
        .bind(id)
        .bind(name)
        .bind(stage_id)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_product(pool: &SqlitePool, id: &str, name: &str, code: Option<&str>) {
    sqlx::query("INSERT INTO products (id, name, code, price, active, created_at) VALUES (?, ?, ?, 100, 1, ?)")
        .bind(id)
        .bind(name)
        .bind(code)
        .bind(Utc::now())
        .execute(pool)
        .await
        .unwrap();
}

/// Prospecting / Negotiation / Closed(fechamento) com o cliente C1 em Prospecting
pub async fn scenario_pool() -> (SqlitePool, CurrentUser) {
    let pool = migrated_pool().await;
    let manager = insert_user(&pool, "Gestora", Role::Gestor).await;
    insert_stage(&pool, "s1", "Prospecting", 0, false).await;
    insert_stage(&pool, "s2", "Negotiation", 1, false).await;
    insert_stage(&pool, "s3", "Closed", 2, true).await;
    insert_client(&pool, "C1", "Cliente Um", "s1", Some(manager.id.as_str())).await;
    insert_product(&pool, "P1", "Plano Pro", Some("PRO")).await;
    (pool, manager)
}
