//! Role/permission store abstraction.
//!
//! The evaluators are read-only consumers of this repository; roles and
//! permissions are maintained by administrative tooling outside this core.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AccessError;
use crate::models::Role;

pub mod memory;
pub mod postgres;

pub use memory::MemoryRoleStore;
pub use postgres::PgRoleStore;

/// Read-only repository over roles, permissions, and role grants.
///
/// Implementations may be remote; callers must treat every method as a
/// potentially-latent call and must not hold any lock across it.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Look up a role by code.
    async fn get_role(&self, role_code: &str) -> Result<Option<Role>, AccessError>;

    /// Resolve the current role of a user.
    async fn get_role_for_user(&self, user_id: Uuid) -> Result<Option<Role>, AccessError>;

    /// Permission codes explicitly granted to a role.
    async fn get_permissions_for_role(&self, role_code: &str) -> Result<Vec<String>, AccessError>;
}
