//! Role hierarchy evaluation - who may manage whom.
//!
//! A principal may manage a target only if the target's level is strictly
//! greater (strictly weaker authority). Protected roles are never valid
//! targets, independent of level. Pure with respect to the store; safe to
//! call concurrently.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AccessError;
use crate::models::Role;
use crate::store::RoleStore;

/// Why a management request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    RoleNotFound,
    ProtectedRole,
    EqualAuthority,
    GreaterAuthority,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::RoleNotFound => write!(f, "role not found"),
            DenyReason::ProtectedRole => write!(f, "target role is protected"),
            DenyReason::EqualAuthority => write!(f, "target has equal authority"),
            DenyReason::GreaterAuthority => write!(f, "target has greater authority"),
        }
    }
}

/// Outcome of a management check, with both resolved levels so the caller
/// can render a precise message.
#[derive(Debug, Clone, Serialize)]
pub struct ManageDecision {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
    pub acting_level: Option<i32>,
    pub target_level: Option<i32>,
}

impl ManageDecision {
    fn allow(acting_level: i32, target_level: i32) -> Self {
        Self {
            allowed: true,
            reason: None,
            acting_level: Some(acting_level),
            target_level: Some(target_level),
        }
    }

    fn deny(reason: DenyReason, acting_level: Option<i32>, target_level: Option<i32>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            acting_level,
            target_level,
        }
    }

    /// Convert into a result, mapping a denial to [`AccessError::Forbidden`].
    pub fn into_result(self) -> Result<(), AccessError> {
        if self.allowed {
            Ok(())
        } else {
            Err(AccessError::Forbidden {
                reason: self
                    .reason
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "management denied".to_string()),
                acting_level: self.acting_level,
                target_level: self.target_level,
            })
        }
    }
}

/// Read-only hierarchy evaluator. No shared mutable state beyond the store.
#[derive(Clone)]
pub struct HierarchyEvaluator {
    store: Arc<dyn RoleStore>,
}

impl HierarchyEvaluator {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// May the acting user manage the target user?
    pub async fn can_manage(
        &self,
        acting_user_id: Uuid,
        target_user_id: Uuid,
    ) -> Result<ManageDecision, AccessError> {
        let acting = self.store.get_role_for_user(acting_user_id).await?;
        let target = self.store.get_role_for_user(target_user_id).await?;
        Ok(self.decide(acting.as_ref(), target.as_ref()))
    }

    /// May the acting user manage users holding the target role?
    pub async fn can_manage_role(
        &self,
        acting_user_id: Uuid,
        target_role_code: &str,
    ) -> Result<ManageDecision, AccessError> {
        let acting = self.store.get_role_for_user(acting_user_id).await?;
        let target = self.store.get_role(target_role_code).await?;
        Ok(self.decide(acting.as_ref(), target.as_ref()))
    }

    fn decide(&self, acting: Option<&Role>, target: Option<&Role>) -> ManageDecision {
        let (acting, target) = match (acting, target) {
            (Some(a), Some(t)) => (a, t),
            (a, t) => {
                return ManageDecision::deny(
                    DenyReason::RoleNotFound,
                    a.map(|r| r.role_level),
                    t.map(|r| r.role_level),
                );
            }
        };

        if target.is_protected {
            tracing::warn!(
                acting_role = %acting.role_code,
                target_role = %target.role_code,
                "management attempt on protected role"
            );
            return ManageDecision::deny(
                DenyReason::ProtectedRole,
                Some(acting.role_level),
                Some(target.role_level),
            );
        }

        if target.role_level > acting.role_level {
            return ManageDecision::allow(acting.role_level, target.role_level);
        }

        let reason = if target.role_level == acting.role_level {
            DenyReason::EqualAuthority
        } else {
            DenyReason::GreaterAuthority
        };
        ManageDecision::deny(reason, Some(acting.role_level), Some(target.role_level))
    }
}
