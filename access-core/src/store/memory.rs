//! In-memory role/permission store for tests and embedded use.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::error::AccessError;
use crate::models::Role;

use super::RoleStore;

#[derive(Default)]
struct Inner {
    roles: HashMap<String, Role>,
    user_roles: HashMap<Uuid, String>,
    role_permissions: HashMap<String, HashSet<String>>,
}

/// In-memory role/permission store. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MemoryRoleStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a role.
    pub fn insert_role(&self, role: Role) {
        self.write().roles.insert(role.role_code.clone(), role);
    }

    /// Assign a user to a role.
    pub fn assign_user(&self, user_id: Uuid, role_code: &str) {
        self.write().user_roles.insert(user_id, role_code.to_string());
    }

    /// Grant a permission code to a role.
    pub fn grant_permission(&self, role_code: &str, permission_code: &str) {
        self.write()
            .role_permissions
            .entry(role_code.to_string())
            .or_default()
            .insert(permission_code.to_string());
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn get_role(&self, role_code: &str) -> Result<Option<Role>, AccessError> {
        Ok(self.read().roles.get(role_code).cloned())
    }

    async fn get_role_for_user(&self, user_id: Uuid) -> Result<Option<Role>, AccessError> {
        let inner = self.read();
        Ok(inner
            .user_roles
            .get(&user_id)
            .and_then(|code| inner.roles.get(code))
            .cloned())
    }

    async fn get_permissions_for_role(&self, role_code: &str) -> Result<Vec<String>, AccessError> {
        Ok(self
            .read()
            .role_permissions
            .get(role_code)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }
}
