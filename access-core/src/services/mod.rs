pub mod audit;
pub mod hierarchy;
pub mod ledger;
pub mod masking;
pub mod permission;

pub use audit::{AuditSink, MemoryAuditSink, PgAuditSink, TracingAuditSink};
pub use hierarchy::{DenyReason, HierarchyEvaluator, ManageDecision};
pub use ledger::{AccessLedger, Clock, ManualClock, SystemClock};
pub use masking::MaskTier;
pub use permission::{PermissionCheck, PermissionEvaluator, WILDCARD_PERMISSION};
