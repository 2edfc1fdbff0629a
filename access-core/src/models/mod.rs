pub mod access_grant;
pub mod audit_event;
pub mod person;
pub mod role;

pub use access_grant::{
    AccessKind, ElevatedAccess, FieldSource, RevokeKind, TemporaryAccessGrant,
};
pub use audit_event::{AuditEvent, AuditEventType};
pub use person::{Address, MaskedPersonRecord, PersonRecord, SensitiveField};
pub use role::{Permission, Principal, ResourceKind, Role, RolePermissionGrant};
