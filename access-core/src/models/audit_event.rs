//! Audit event model - the record pushed into an audit sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::access_grant::{RevokeKind, TemporaryAccessGrant};

/// Audit event types emitted by the access-control core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AccessDenied,
    ManagementDenied,
    GrantIssued,
    EmergencyAccessGranted,
    GrantRevoked,
    RateLimitExceeded,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::AccessDenied => "access_denied",
            AuditEventType::ManagementDenied => "management_denied",
            AuditEventType::GrantIssued => "grant_issued",
            AuditEventType::EmergencyAccessGranted => "emergency_access_granted",
            AuditEventType::GrantRevoked => "grant_revoked",
            AuditEventType::RateLimitExceeded => "rate_limit_exceeded",
        }
    }
}

/// Audit event entity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub actor_user_id: Option<Uuid>,
    pub event_type_code: String,
    pub target_type: Option<String>,
    pub target_id: Option<Uuid>,
    pub event_data: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub created_utc: DateTime<Utc>,
}

impl AuditEvent {
    fn base(event_type: AuditEventType, actor_user_id: Option<Uuid>, success: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            actor_user_id,
            event_type_code: event_type.as_str().to_string(),
            target_type: None,
            target_id: None,
            event_data: None,
            ip_address: None,
            user_agent: None,
            success,
            created_utc: Utc::now(),
        }
    }

    /// Permission denial, with the denied code and attempted resource.
    pub fn access_denied(
        actor_user_id: Uuid,
        permission_code: &str,
        resource: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        let mut event = Self::base(AuditEventType::AccessDenied, Some(actor_user_id), false);
        event.target_type = Some(resource.to_string());
        event.event_data = Some(serde_json::json!({
            "permission_code": permission_code,
            "resource": resource,
        }));
        event.ip_address = ip_address;
        event.user_agent = user_agent;
        event
    }

    /// Hierarchy denial, with both resolved levels for diagnostics.
    pub fn management_denied(
        actor_user_id: Uuid,
        target_id: Uuid,
        reason: &str,
        acting_level: Option<i32>,
        target_level: Option<i32>,
    ) -> Self {
        let mut event = Self::base(AuditEventType::ManagementDenied, Some(actor_user_id), false);
        event.target_type = Some("user".to_string());
        event.target_id = Some(target_id);
        event.event_data = Some(serde_json::json!({
            "reason": reason,
            "acting_level": acting_level,
            "target_level": target_level,
        }));
        event
    }

    /// Temporary access grant issuance.
    pub fn grant_issued(grant: &TemporaryAccessGrant) -> Self {
        let event_type = match grant.kind {
            super::access_grant::AccessKind::EmergencyAccess => {
                AuditEventType::EmergencyAccessGranted
            }
            _ => AuditEventType::GrantIssued,
        };
        let mut event = Self::base(event_type, Some(grant.viewer_id), true);
        event.target_type = Some("person".to_string());
        event.target_id = Some(grant.target_id);
        event.event_data = Some(serde_json::json!({
            "access_id": grant.access_id,
            "kind": grant.kind.as_str(),
            "fields": grant.access_fields,
            "reason": grant.reason,
            "expires_at": grant.expires_at,
        }));
        event
    }

    /// Temporary access grant revocation.
    pub fn grant_revoked(grant: &TemporaryAccessGrant, kind: RevokeKind) -> Self {
        let mut event = Self::base(AuditEventType::GrantRevoked, Some(grant.viewer_id), true);
        event.target_type = Some("person".to_string());
        event.target_id = Some(grant.target_id);
        event.event_data = Some(serde_json::json!({
            "access_id": grant.access_id,
            "revoke_kind": kind.as_str(),
        }));
        event
    }

    /// Grant issuance blocked by the daily budget.
    pub fn rate_limit_exceeded(viewer_id: Uuid, limit: u32) -> Self {
        let mut event = Self::base(AuditEventType::RateLimitExceeded, Some(viewer_id), false);
        event.event_data = Some(serde_json::json!({ "daily_limit": limit }));
        event
    }
}
