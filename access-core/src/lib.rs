//! Access-control and privacy-disclosure core for the farm management
//! platform.
//!
//! Provides, as a library consumed by route handlers:
//! - permission evaluation over a role/permission store
//! - role-hierarchy management checks honoring protected roles
//! - data masking of personally identifiable fields by viewer tier
//! - a time-boxed temporary access ledger with auto-expiry and a daily
//!   grant budget
//! - audit sinks for denials, grants, and revocations
//!
//! The core assumes an already-authenticated [`Principal`]; token handling
//! and HTTP wiring live in the embedding service.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;
use uuid::Uuid;

pub use config::{AccessConfig, DatabaseConfig};
pub use error::AccessError;
pub use models::{
    AccessKind, Address, AuditEvent, AuditEventType, ElevatedAccess, MaskedPersonRecord,
    PersonRecord, Principal, ResourceKind, RevokeKind, Role, SensitiveField,
    TemporaryAccessGrant,
};
pub use services::{
    AccessLedger, AuditSink, HierarchyEvaluator, ManageDecision, MaskTier, PermissionCheck,
    PermissionEvaluator, TracingAuditSink,
};
pub use store::{MemoryRoleStore, PgRoleStore, RoleStore};

/// Bundled engine wiring the evaluators, the ledger, and an audit sink
/// together. Constructed once at process start and injected into request
/// handlers; call [`AccessEngine::shutdown`] on the way out to stop the
/// ledger sweeper.
pub struct AccessEngine {
    pub permissions: PermissionEvaluator,
    pub hierarchy: HierarchyEvaluator,
    pub ledger: Arc<AccessLedger>,
    pub audit: Arc<dyn AuditSink>,
}

impl AccessEngine {
    /// Wire the engine without starting any background work. Callers that
    /// want expired grants swept must call [`AccessLedger::spawn_sweeper`]
    /// themselves, or construct through [`AccessEngine::start`].
    pub fn new(store: Arc<dyn RoleStore>, audit: Arc<dyn AuditSink>, config: AccessConfig) -> Self {
        let ledger = AccessLedger::new(config);
        Self {
            permissions: PermissionEvaluator::new(Arc::clone(&store)),
            hierarchy: HierarchyEvaluator::new(store),
            ledger,
            audit,
        }
    }

    /// Wire the engine and start the hourly ledger sweep. Must be called
    /// from within a tokio runtime; [`AccessEngine::shutdown`] stops the
    /// sweep again.
    pub fn start(
        store: Arc<dyn RoleStore>,
        audit: Arc<dyn AuditSink>,
        config: AccessConfig,
    ) -> Self {
        let engine = Self::new(store, audit, config);
        engine.ledger.spawn_sweeper();
        engine
    }

    /// Mask a person record for a viewer, honoring any live temporary grant
    /// for this viewer/target pair.
    pub fn view_person(
        &self,
        viewer: &Principal,
        target_id: Uuid,
        record: &PersonRecord,
    ) -> MaskedPersonRecord {
        let elevated = self
            .ledger
            .check_access(viewer.user_id, target_id)
            .map(|access| access.fields)
            .unwrap_or_default();
        services::masking::mask_record_elevated(record, &viewer.role_code, &elevated)
    }

    /// Stop the ledger's background sweep.
    pub fn shutdown(&self) {
        self.ledger.shutdown();
    }
}
