//! Shared fixtures for access-core integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use access_core::{
    AccessConfig, AccessError, Address, MemoryRoleStore, PersonRecord, Role, RoleStore,
};
use uuid::Uuid;

/// Install a test subscriber once; later calls are a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const SUPER_ADMIN: &str = "SUPER_ADMIN";
pub const ADMIN: &str = "ADMIN";
pub const OFFICER: &str = "OFFICER";
pub const RESEARCHER: &str = "RESEARCHER";
pub const FARMER: &str = "FARMER";
/// Service account role: high numeric level but protected, so it exercises
/// the protected-role override against every other role.
pub const SYSTEM: &str = "SYSTEM";

/// The deployed role catalog: code, label, level, protected.
pub fn role_catalog() -> Vec<Role> {
    vec![
        Role::new(SUPER_ADMIN, "Super Administrator", 0, true),
        Role::new(ADMIN, "Administrator", 1, false),
        Role::new(OFFICER, "Field Officer", 2, false),
        Role::new(RESEARCHER, "Researcher", 3, false),
        Role::new(FARMER, "Farmer", 4, false),
        Role::new(SYSTEM, "Service Account", 99, true),
    ]
}

/// A store seeded with the role catalog, explicit permission grants, and one
/// user per role. Returns the store and the per-role user ids.
pub fn seeded_store() -> (Arc<MemoryRoleStore>, HashMap<&'static str, Uuid>) {
    init_tracing();
    let store = MemoryRoleStore::new();
    for role in role_catalog() {
        store.insert_role(role);
    }

    store.grant_permission(SUPER_ADMIN, "*");
    for code in ["user.manage", "person.view", "report.view"] {
        store.grant_permission(ADMIN, code);
    }
    for code in ["person.view", "report.view"] {
        store.grant_permission(OFFICER, code);
    }
    store.grant_permission(RESEARCHER, "report.view");
    store.grant_permission(FARMER, "profile.view");

    let mut users = HashMap::new();
    for role in role_catalog() {
        let user_id = Uuid::new_v4();
        store.assign_user(user_id, &role.role_code);
        users.insert(
            match role.role_code.as_str() {
                "SUPER_ADMIN" => SUPER_ADMIN,
                "ADMIN" => ADMIN,
                "OFFICER" => OFFICER,
                "RESEARCHER" => RESEARCHER,
                "FARMER" => FARMER,
                _ => SYSTEM,
            },
            user_id,
        );
    }

    (Arc::new(store), users)
}

/// Store handle widened to the trait object the evaluators take.
pub fn as_role_store(store: &Arc<MemoryRoleStore>) -> Arc<dyn RoleStore> {
    Arc::clone(store) as Arc<dyn RoleStore>
}

pub fn test_config() -> AccessConfig {
    AccessConfig::default()
}

/// Store whose every lookup fails, for exercising the path where the
/// backing database is down. Evaluators must surface the failure, never
/// turn it into a decision.
#[derive(Clone, Copy, Default)]
pub struct UnavailableRoleStore;

#[async_trait::async_trait]
impl RoleStore for UnavailableRoleStore {
    async fn get_role(&self, _role_code: &str) -> Result<Option<Role>, AccessError> {
        Err(AccessError::StoreUnavailable(anyhow::anyhow!(
            "connection refused"
        )))
    }

    async fn get_role_for_user(&self, _user_id: Uuid) -> Result<Option<Role>, AccessError> {
        Err(AccessError::StoreUnavailable(anyhow::anyhow!(
            "connection refused"
        )))
    }

    async fn get_permissions_for_role(
        &self,
        _role_code: &str,
    ) -> Result<Vec<String>, AccessError> {
        Err(AccessError::StoreUnavailable(anyhow::anyhow!(
            "connection refused"
        )))
    }
}

/// Person record with the documented masking scenarios' values.
pub fn person_fixture() -> PersonRecord {
    PersonRecord {
        id_card: "1301700136939".to_string(),
        phone: "0903599265".to_string(),
        first_name: "Somchai".to_string(),
        last_name: "Jaidee".to_string(),
        address: Address {
            house_no: "42/7".to_string(),
            village_no: Some("3".to_string()),
            subdistrict: "Nong Bua".to_string(),
            district: "Mueang".to_string(),
            province: "Nakhon Ratchasima".to_string(),
            postal_code: "30000".to_string(),
        },
        latitude: 14.9799,
        longitude: 102.0978,
    }
}
