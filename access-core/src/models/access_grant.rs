//! Temporary access grant model - time-boxed disclosure elevation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::person::SensitiveField;

/// How a temporary grant came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// Short-lived, user-initiated reveal of specific masked fields.
    ClickToReveal,
    /// Tagged, fixed-duration grant for urgent justified disclosure.
    EmergencyAccess,
    /// Grant issued through an approval workflow.
    TemporaryApproval,
}

impl AccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::ClickToReveal => "click_to_reveal",
            AccessKind::EmergencyAccess => "emergency_access",
            AccessKind::TemporaryApproval => "temporary_approval",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "emergency_access" => AccessKind::EmergencyAccess,
            "temporary_approval" => AccessKind::TemporaryApproval,
            _ => AccessKind::ClickToReveal,
        }
    }
}

/// How a grant was revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokeKind {
    /// Revoked by the viewer themselves.
    Manual,
    /// Revoked by an administrator.
    Administrative,
}

impl RevokeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevokeKind::Manual => "manual",
            RevokeKind::Administrative => "administrative",
        }
    }
}

/// Time-boxed record elevating one viewer's visibility into one target's
/// specific fields. Owned exclusively by the ledger; nothing else mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryAccessGrant {
    pub access_id: Uuid,
    pub viewer_id: Uuid,
    pub target_id: Uuid,
    pub reason: String,
    pub kind: AccessKind,
    pub access_fields: HashSet<SensitiveField>,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revoke_kind: Option<RevokeKind>,
}

impl TemporaryAccessGrant {
    /// Create a new grant starting at `now`.
    pub fn new(
        viewer_id: Uuid,
        target_id: Uuid,
        reason: impl Into<String>,
        kind: AccessKind,
        fields: HashSet<SensitiveField>,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_id: Uuid::new_v4(),
            viewer_id,
            target_id,
            reason: reason.into(),
            kind,
            access_fields: fields,
            granted_at: now,
            expires_at: now + duration,
            revoked: false,
            revoked_at: None,
            revoke_kind: None,
        }
    }

    /// Live iff neither revoked nor past expiry. Liveness is the only
    /// condition gating the grant's effect on masking.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && now < self.expires_at
    }
}

/// Per-field provenance of an elevated access decision.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSource {
    pub access_id: Uuid,
    pub reason: String,
    pub expires_at: DateTime<Utc>,
}

/// Union of live grants for one viewer/target pair. Multiple simultaneous
/// grants combine additively. When several live grants cover the same field,
/// the most recently granted record supplies that field's [`FieldSource`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ElevatedAccess {
    pub fields: HashSet<SensitiveField>,
    pub field_sources: HashMap<SensitiveField, FieldSource>,
}
