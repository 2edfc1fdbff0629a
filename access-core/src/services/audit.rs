//! Audit sink - side-channel recording of authorization outcomes.
//!
//! Sink failures are logged and swallowed; they never block or change the
//! primary authorization decision.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use std::sync::{Arc, Mutex};

use crate::models::AuditEvent;

/// Destination for audit events.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// Sink that emits structured tracing events.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) {
        tracing::info!(
            event_id = %event.event_id,
            event_type = %event.event_type_code,
            actor_user_id = ?event.actor_user_id,
            target_id = ?event.target_id,
            success = event.success,
            "audit event"
        );
    }
}

/// Sink that persists events to the `audit_events` table.
#[derive(Clone)]
pub struct PgAuditSink {
    pool: PgPool,
}

impl PgAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, event: AuditEvent) {
        let result = sqlx::query(
            r#"
            INSERT INTO audit_events
                (event_id, actor_user_id, event_type_code, target_type, target_id,
                 event_data, ip_address, user_agent, success, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.event_id)
        .bind(event.actor_user_id)
        .bind(&event.event_type_code)
        .bind(&event.target_type)
        .bind(event.target_id)
        .bind(&event.event_data)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(event.success)
        .bind(event.created_utc)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::error!(
                error = %e,
                event_type = %event.event_type_code,
                "failed to write audit event"
            );
        }
    }
}

/// In-memory sink for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
