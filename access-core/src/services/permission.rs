//! Permission evaluation over the role/permission store.
//!
//! Stateless and read-only; safe under unlimited parallel invocation. On a
//! denial in an enforcement context the caller is responsible for pushing an
//! `access_denied` audit event through its sink.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AccessError;
use crate::store::RoleStore;

/// Permission code that grants everything (superadmin convention).
pub const WILDCARD_PERMISSION: &str = "*";

/// Outcome of a multi-permission check. Every requested code is evaluated,
/// so `missing` is the complete list for audit purposes, not just the first
/// failure.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionCheck {
    pub allowed: bool,
    pub missing: Vec<String>,
}

/// Stateless permission evaluator.
#[derive(Clone)]
pub struct PermissionEvaluator {
    store: Arc<dyn RoleStore>,
}

impl PermissionEvaluator {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// Check whether the user's role grants the permission code.
    ///
    /// A user with no resolvable role denies every permission.
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        permission_code: &str,
    ) -> Result<bool, AccessError> {
        let Some(role) = self.store.get_role_for_user(user_id).await? else {
            tracing::warn!(
                user_id = %user_id,
                permission_code = %permission_code,
                "permission check for user with no resolvable role"
            );
            return Ok(false);
        };

        let grants = self.store.get_permissions_for_role(&role.role_code).await?;
        Ok(grants
            .iter()
            .any(|g| g == WILDCARD_PERMISSION || g == permission_code))
    }

    /// Check every code and report the complete missing set.
    pub async fn has_all_permissions(
        &self,
        user_id: Uuid,
        permission_codes: &[&str],
    ) -> Result<PermissionCheck, AccessError> {
        let Some(role) = self.store.get_role_for_user(user_id).await? else {
            return Ok(PermissionCheck {
                allowed: false,
                missing: permission_codes.iter().map(|c| c.to_string()).collect(),
            });
        };

        let grants: HashSet<String> = self
            .store
            .get_permissions_for_role(&role.role_code)
            .await?
            .into_iter()
            .collect();

        if grants.contains(WILDCARD_PERMISSION) {
            return Ok(PermissionCheck {
                allowed: true,
                missing: Vec::new(),
            });
        }

        let missing: Vec<String> = permission_codes
            .iter()
            .filter(|code| !grants.contains(**code))
            .map(|code| code.to_string())
            .collect();

        Ok(PermissionCheck {
            allowed: missing.is_empty(),
            missing,
        })
    }

    /// Reconciliation invariant: the higher-authority role must carry every
    /// permission granted to the lower-authority one. Returns the codes the
    /// higher role is missing; empty means the invariant holds.
    ///
    /// There is no inheritance between roles, so this containment has to be
    /// maintained explicitly and checked structurally.
    pub async fn verify_tier_containment(
        &self,
        higher_role: &str,
        lower_role: &str,
    ) -> Result<Vec<String>, AccessError> {
        let higher: HashSet<String> = self
            .store
            .get_permissions_for_role(higher_role)
            .await?
            .into_iter()
            .collect();

        if higher.contains(WILDCARD_PERMISSION) {
            return Ok(Vec::new());
        }

        let mut missing: Vec<String> = self
            .store
            .get_permissions_for_role(lower_role)
            .await?
            .into_iter()
            .filter(|code| !higher.contains(code))
            .collect();
        missing.sort();

        if !missing.is_empty() {
            tracing::warn!(
                higher_role = %higher_role,
                lower_role = %lower_role,
                missing = ?missing,
                "tier containment violated"
            );
        }

        Ok(missing)
    }
}
