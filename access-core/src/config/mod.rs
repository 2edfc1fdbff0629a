//! Configuration for the access-control core.
//!
//! All tunables come from the environment with sensible defaults, so an
//! embedding service can construct [`AccessConfig`] without any setup.

use serde::Deserialize;
use std::env;

use crate::error::AccessError;

/// Emergency grants always last this long, regardless of the configured
/// default duration.
pub const EMERGENCY_ACCESS_SECS: u64 = 2 * 60 * 60;

/// Tunables for the temporary access ledger.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Grant duration applied when the caller does not pass one (default 2h).
    pub default_grant_duration_secs: u64,
    /// Grants a single viewer may be issued per calendar day (default 10).
    pub daily_grant_limit: u32,
    /// How long expired or revoked records stay in the ledger as a short
    /// in-memory audit trail (default 5 min).
    pub revoked_retention_secs: u64,
    /// Interval of the background sweep task (default 1h).
    pub sweep_interval_secs: u64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            default_grant_duration_secs: 2 * 60 * 60,
            daily_grant_limit: 10,
            revoked_retention_secs: 5 * 60,
            sweep_interval_secs: 60 * 60,
        }
    }
}

impl AccessConfig {
    /// Load from the environment, falling back to the defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_grant_duration_secs: env_u64(
                "ACCESS_DEFAULT_GRANT_DURATION_SECS",
                defaults.default_grant_duration_secs,
            ),
            daily_grant_limit: env_u64("ACCESS_DAILY_GRANT_LIMIT", defaults.daily_grant_limit as u64)
                as u32,
            revoked_retention_secs: env_u64(
                "ACCESS_REVOKED_RETENTION_SECS",
                defaults.revoked_retention_secs,
            ),
            sweep_interval_secs: env_u64("ACCESS_SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs),
        }
    }

    pub fn default_grant_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.default_grant_duration_secs as i64)
    }

    pub fn revoked_retention(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.revoked_retention_secs as i64)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Connection settings for the PostgreSQL role/permission store.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Load from the environment. `DATABASE_URL` is required.
    pub fn from_env() -> Result<Self, AccessError> {
        let url = env::var("DATABASE_URL")
            .map_err(|_| AccessError::Config("DATABASE_URL is not set".to_string()))?;
        Ok(Self {
            url,
            max_connections: env_u64("DATABASE_MAX_CONNECTIONS", 10) as u32,
            min_connections: env_u64("DATABASE_MIN_CONNECTIONS", 1) as u32,
        })
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
