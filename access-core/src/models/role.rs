//! Role and permission models - the static authorization catalog.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AccessError;

/// Role entity. `role_level` is the authority rank: a smaller value means
/// strictly greater authority. Protected roles can never be the target of a
/// management operation, regardless of level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub role_code: String,
    pub role_label: String,
    pub role_level: i32,
    pub is_protected: bool,
}

impl Role {
    /// Create a new role.
    pub fn new(
        role_code: impl Into<String>,
        role_label: impl Into<String>,
        role_level: i32,
        is_protected: bool,
    ) -> Self {
        Self {
            role_code: role_code.into(),
            role_label: role_label.into(),
            role_level,
            is_protected,
        }
    }
}

/// Permission entity. `permission_code` is globally unique across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    pub permission_code: String,
    pub resource: String,
    pub action: String,
}

impl Permission {
    /// Create a new permission.
    pub fn new(
        permission_code: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            permission_code: permission_code.into(),
            resource: resource.into(),
            action: action.into(),
        }
    }
}

/// Role to permission mapping row. A role's effective permission set is
/// exactly its explicit grants; there is no inheritance between roles.
#[derive(Debug, Clone, FromRow)]
pub struct RolePermissionGrant {
    pub role_code: String,
    pub permission_code: String,
}

/// Authenticated principal resolved by the session layer, supplied per
/// request. The core never authenticates; it only decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub role_code: String,
}

impl Principal {
    pub fn new(user_id: Uuid, role_code: impl Into<String>) -> Self {
        Self {
            user_id,
            role_code: role_code.into(),
        }
    }
}

/// Resource kinds the ownership checks understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Farm,
    Plot,
    Harvest,
    Feedback,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Farm => "farm",
            ResourceKind::Plot => "plot",
            ResourceKind::Harvest => "harvest",
            ResourceKind::Feedback => "feedback",
        }
    }

    /// An unrecognized kind is a missing policy branch, not a deny.
    pub fn parse(s: &str) -> Result<Self, AccessError> {
        match s {
            "farm" => Ok(ResourceKind::Farm),
            "plot" => Ok(ResourceKind::Plot),
            "harvest" => Ok(ResourceKind::Harvest),
            "feedback" => Ok(ResourceKind::Feedback),
            other => Err(AccessError::InvalidResourceType(other.to_string())),
        }
    }
}
