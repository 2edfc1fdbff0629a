//! Error taxonomy for the access-control core.
//!
//! Denials carry enough detail for the caller to render a precise message.
//! Store failures are a distinct condition: callers must map
//! [`AccessError::StoreUnavailable`] to a 5xx-equivalent response, never to
//! "access denied".

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AccessError {
    /// No role could be resolved for the user. Fail closed: every check
    /// against an unresolvable principal denies.
    #[error("no role could be resolved for user {0}")]
    RoleNotFound(Uuid),

    /// Role hierarchy or permission violation.
    #[error("{reason}")]
    Forbidden {
        reason: String,
        acting_level: Option<i32>,
        target_level: Option<i32>,
    },

    /// Grant issuance blocked by the per-viewer daily budget.
    #[error("daily grant limit of {limit} reached for viewer {viewer_id}")]
    RateLimited { viewer_id: Uuid, limit: u32 },

    /// Ownership check routed with an unrecognized resource kind. This is a
    /// missing policy branch, not a deny; surface it loudly.
    #[error("unrecognized resource type: {0}")]
    InvalidResourceType(String),

    /// The role/permission store could not be reached or answered with an
    /// error. Never conflated with a denial.
    #[error("role/permission store unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AccessError {
    /// True for denial outcomes, false for infrastructure failures.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            AccessError::RoleNotFound(_)
                | AccessError::Forbidden { .. }
                | AccessError::RateLimited { .. }
        )
    }
}
