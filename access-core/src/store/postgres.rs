//! PostgreSQL-backed role/permission store.
//!
//! All lookups go through a shared connection pool with a bounded lifetime
//! rather than opening a fresh connection per check.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::error::AccessError;
use crate::models::Role;

use super::RoleStore;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.url)
        .await?;

    tracing::info!("Successfully connected to PostgreSQL");

    Ok(pool)
}

/// PostgreSQL role/permission store.
#[derive(Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    /// Create a new store from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AccessError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Role store health check failed: {}", e);
                AccessError::StoreUnavailable(anyhow::anyhow!(e))
            })?;
        Ok(())
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn get_role(&self, role_code: &str) -> Result<Option<Role>, AccessError> {
        sqlx::query_as::<_, Role>(
            "SELECT role_code, role_label, role_level, is_protected FROM roles WHERE role_code = $1",
        )
        .bind(role_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccessError::StoreUnavailable(anyhow::anyhow!(e)))
    }

    async fn get_role_for_user(&self, user_id: Uuid) -> Result<Option<Role>, AccessError> {
        sqlx::query_as::<_, Role>(
            r#"
            SELECT r.role_code, r.role_label, r.role_level, r.is_protected
            FROM roles r
            JOIN users u ON u.role_code = r.role_code
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccessError::StoreUnavailable(anyhow::anyhow!(e)))
    }

    async fn get_permissions_for_role(&self, role_code: &str) -> Result<Vec<String>, AccessError> {
        sqlx::query_scalar::<_, String>(
            "SELECT permission_code FROM role_permissions WHERE role_code = $1",
        )
        .bind(role_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AccessError::StoreUnavailable(anyhow::anyhow!(e)))
    }
}
