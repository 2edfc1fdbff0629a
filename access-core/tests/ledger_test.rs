//! Integration tests for the temporary access ledger.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use access_core::services::ledger::{AccessLedger, ManualClock};
use access_core::{AccessConfig, AccessError, AccessKind, RevokeKind, SensitiveField};
use chrono::{Duration, TimeZone, Utc};
use common::test_config;
use uuid::Uuid;

fn ledger_at_nine() -> (Arc<AccessLedger>, ManualClock) {
    common::init_tracing();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap());
    let ledger = AccessLedger::with_clock(test_config(), Arc::new(clock.clone()));
    (ledger, clock)
}

fn fields(list: &[SensitiveField]) -> HashSet<SensitiveField> {
    list.iter().copied().collect()
}

#[tokio::test]
async fn test_grant_is_visible_immediately() {
    let (ledger, _clock) = ledger_at_nine();
    let viewer = Uuid::new_v4();
    let target = Uuid::new_v4();

    let grant = ledger
        .grant(
            viewer,
            target,
            "verify id for subsidy payout",
            AccessKind::ClickToReveal,
            None,
            fields(&[SensitiveField::IdCard, SensitiveField::Phone]),
        )
        .unwrap();

    let access = ledger.check_access(viewer, target).unwrap();
    assert!(access.fields.is_superset(&grant.access_fields));
    assert_eq!(
        access.field_sources[&SensitiveField::IdCard].access_id,
        grant.access_id
    );

    // other pairs are unaffected
    assert!(ledger.check_access(viewer, Uuid::new_v4()).is_none());
    assert!(ledger.check_access(Uuid::new_v4(), target).is_none());
}

#[tokio::test]
async fn test_default_duration_is_two_hours() {
    let (ledger, clock) = ledger_at_nine();
    let grant = ledger
        .grant(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "routine check",
            AccessKind::TemporaryApproval,
            None,
            fields(&[SensitiveField::Address]),
        )
        .unwrap();
    assert_eq!(grant.expires_at - grant.granted_at, Duration::hours(2));
    assert_eq!(grant.granted_at, clock.now());
}

#[tokio::test]
async fn test_short_grant_expires_on_clock_advance() {
    let (ledger, clock) = ledger_at_nine();
    let viewer = Uuid::new_v4();
    let target = Uuid::new_v4();

    ledger
        .grant(
            viewer,
            target,
            "one second reveal",
            AccessKind::ClickToReveal,
            Some(Duration::milliseconds(1000)),
            fields(&[SensitiveField::IdCard]),
        )
        .unwrap();

    let access = ledger.check_access(viewer, target).unwrap();
    assert!(access.fields.contains(&SensitiveField::IdCard));

    clock.advance(Duration::milliseconds(1100));
    assert!(ledger.check_access(viewer, target).is_none());
}

#[tokio::test]
async fn test_live_grants_union_additively() {
    let (ledger, clock) = ledger_at_nine();
    let viewer = Uuid::new_v4();
    let target = Uuid::new_v4();

    let first = ledger
        .grant(
            viewer,
            target,
            "confirm registration details",
            AccessKind::ClickToReveal,
            None,
            fields(&[SensitiveField::IdCard, SensitiveField::Phone]),
        )
        .unwrap();
    clock.advance(Duration::seconds(30));
    let second = ledger
        .grant(
            viewer,
            target,
            "site visit coordinates",
            AccessKind::TemporaryApproval,
            None,
            fields(&[SensitiveField::Phone, SensitiveField::Location]),
        )
        .unwrap();

    let access = ledger.check_access(viewer, target).unwrap();
    assert_eq!(
        access.fields,
        fields(&[
            SensitiveField::IdCard,
            SensitiveField::Phone,
            SensitiveField::Location
        ])
    );

    // the most recently granted record wins the shared field's metadata
    assert_eq!(
        access.field_sources[&SensitiveField::Phone].access_id,
        second.access_id
    );
    assert_eq!(
        access.field_sources[&SensitiveField::Phone].reason,
        "site visit coordinates"
    );
    assert_eq!(
        access.field_sources[&SensitiveField::IdCard].access_id,
        first.access_id
    );
}

#[tokio::test]
async fn test_revoke_removes_only_solely_contributed_fields() {
    let (ledger, _clock) = ledger_at_nine();
    let viewer = Uuid::new_v4();
    let target = Uuid::new_v4();

    let first = ledger
        .grant(
            viewer,
            target,
            "id and phone",
            AccessKind::ClickToReveal,
            None,
            fields(&[SensitiveField::IdCard, SensitiveField::Phone]),
        )
        .unwrap();
    ledger
        .grant(
            viewer,
            target,
            "phone only",
            AccessKind::ClickToReveal,
            None,
            fields(&[SensitiveField::Phone]),
        )
        .unwrap();

    ledger.revoke(first.access_id, RevokeKind::Manual);

    let access = ledger.check_access(viewer, target).unwrap();
    assert!(!access.fields.contains(&SensitiveField::IdCard));
    assert!(access.fields.contains(&SensitiveField::Phone));
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let (ledger, clock) = ledger_at_nine();
    let grant = ledger
        .grant(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "to be revoked",
            AccessKind::ClickToReveal,
            None,
            fields(&[SensitiveField::Name]),
        )
        .unwrap();

    ledger.revoke(grant.access_id, RevokeKind::Manual);
    let after_first = ledger.find(grant.access_id).unwrap();

    // a later second revoke must not restamp the metadata
    clock.advance(Duration::minutes(1));
    ledger.revoke(grant.access_id, RevokeKind::Administrative);
    let after_second = ledger.find(grant.access_id).unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.revoke_kind, Some(RevokeKind::Manual));
}

#[tokio::test]
async fn test_revoke_unknown_id_is_a_noop() {
    let (ledger, _clock) = ledger_at_nine();
    // must not panic or error
    ledger.revoke(Uuid::new_v4(), RevokeKind::Administrative);
}

#[tokio::test]
async fn test_daily_rate_limit_gates_grant() {
    let (ledger, clock) = ledger_at_nine();
    let viewer = Uuid::new_v4();

    for i in 0..10 {
        ledger
            .grant(
                viewer,
                Uuid::new_v4(),
                format!("case {i}"),
                AccessKind::ClickToReveal,
                None,
                fields(&[SensitiveField::Phone]),
            )
            .unwrap();
    }
    assert!(ledger.check_rate_limit(viewer, 10));

    // the 11th issuance is blocked regardless of target or field set
    let err = ledger
        .grant(
            viewer,
            Uuid::new_v4(),
            "one too many",
            AccessKind::EmergencyAccess,
            None,
            fields(&[SensitiveField::Location]),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::RateLimited { limit: 10, viewer_id } if viewer_id == viewer
    ));

    // a different viewer keeps their own budget
    assert!(!ledger.check_rate_limit(Uuid::new_v4(), 10));

    // the budget resets with the calendar day
    clock.advance(Duration::days(1));
    assert!(!ledger.check_rate_limit(viewer, 10));
    ledger
        .grant(
            viewer,
            Uuid::new_v4(),
            "fresh day",
            AccessKind::ClickToReveal,
            None,
            fields(&[SensitiveField::Phone]),
        )
        .unwrap();
}

#[tokio::test]
async fn test_emergency_grant_is_tagged_and_fixed_duration() {
    let (ledger, _clock) = ledger_at_nine();
    let grant = ledger
        .grant_emergency(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "farmer unreachable during flood",
            "disaster_response",
            fields(&[SensitiveField::Phone, SensitiveField::Location]),
        )
        .unwrap();

    assert_eq!(grant.kind, AccessKind::EmergencyAccess);
    assert_eq!(
        grant.reason,
        "[disaster_response] farmer unreachable during flood"
    );
    assert_eq!(grant.expires_at - grant.granted_at, Duration::hours(2));
}

#[tokio::test]
async fn test_sweep_honors_retention_window() {
    let (ledger, clock) = ledger_at_nine();
    let grant = ledger
        .grant(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "short lived",
            AccessKind::ClickToReveal,
            Some(Duration::seconds(1)),
            fields(&[SensitiveField::IdCard]),
        )
        .unwrap();

    // expired but inside the 5 minute retention window: kept as audit trail
    clock.advance(Duration::seconds(2));
    assert_eq!(ledger.sweep(), 0);
    assert!(ledger.find(grant.access_id).is_some());

    clock.advance(Duration::minutes(6));
    assert_eq!(ledger.sweep(), 1);
    assert!(ledger.find(grant.access_id).is_none());
}

#[tokio::test]
async fn test_sweep_reclaims_revoked_records_after_retention() {
    let (ledger, clock) = ledger_at_nine();
    let grant = ledger
        .grant(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "revoked soon",
            AccessKind::TemporaryApproval,
            None,
            fields(&[SensitiveField::Address]),
        )
        .unwrap();

    ledger.revoke(grant.access_id, RevokeKind::Administrative);
    assert_eq!(ledger.sweep(), 0);

    clock.advance(Duration::minutes(6));
    assert_eq!(ledger.sweep(), 1);
}

#[tokio::test]
async fn test_sweeper_task_stops_on_shutdown() {
    let mut config = AccessConfig::default();
    config.sweep_interval_secs = 1;
    let ledger = AccessLedger::new(config);

    let handle = ledger.spawn_sweeper();
    ledger.shutdown();
    handle.await.unwrap();
}
