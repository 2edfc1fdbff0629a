//! Temporary access ledger - time-boxed disclosure grants.
//!
//! One logical owner of all grant state: every operation serializes through
//! a single mutex, so a grant is visible to `check_access` the moment
//! `grant` returns, and a revoke cannot race the sweep. Expiry is a pure
//! function of the clock evaluated lazily on every check; the hourly sweep
//! only reclaims memory.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::{AccessConfig, EMERGENCY_ACCESS_SECS};
use crate::error::AccessError;
use crate::models::access_grant::{
    AccessKind, ElevatedAccess, FieldSource, RevokeKind, TemporaryAccessGrant,
};
use crate::models::person::SensitiveField;

/// Clock abstraction so expiry and rate-limit windows are testable without
/// sleeping.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic tests.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Default)]
struct LedgerState {
    grants: HashMap<Uuid, TemporaryAccessGrant>,
    /// Issuance counts per viewer for the current day. Kept separately from
    /// the grant map so sweeping expired records cannot refund a viewer's
    /// daily budget.
    issued_today: HashMap<Uuid, (NaiveDate, u32)>,
}

/// In-process ledger of temporary access grants.
///
/// Constructed once at process start; call [`AccessLedger::spawn_sweeper`]
/// to start the background sweep and [`AccessLedger::shutdown`] on the way
/// out.
pub struct AccessLedger {
    state: Mutex<LedgerState>,
    config: AccessConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl AccessLedger {
    pub fn new(config: AccessConfig) -> Arc<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AccessConfig, clock: Arc<dyn Clock>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(LedgerState::default()),
            config,
            clock,
            cancel: CancellationToken::new(),
        })
    }

    /// Issue a grant elevating `viewer_id`'s visibility into `target_id`'s
    /// fields. Falls back to the configured default duration when none is
    /// given.
    ///
    /// The daily rate limit is enforced here, not left to call sites: once
    /// the viewer's issuance count for the current day reaches the limit,
    /// this returns [`AccessError::RateLimited`].
    pub fn grant(
        &self,
        viewer_id: Uuid,
        target_id: Uuid,
        reason: impl Into<String>,
        kind: AccessKind,
        duration: Option<Duration>,
        fields: HashSet<SensitiveField>,
    ) -> Result<TemporaryAccessGrant, AccessError> {
        let now = self.clock.now();
        let today = now.date_naive();
        let mut state = self.lock();

        let count = match state.issued_today.get(&viewer_id) {
            Some((day, n)) if *day == today => *n,
            _ => 0,
        };
        if count >= self.config.daily_grant_limit {
            tracing::warn!(
                viewer_id = %viewer_id,
                limit = self.config.daily_grant_limit,
                "temporary access grant blocked by daily limit"
            );
            return Err(AccessError::RateLimited {
                viewer_id,
                limit: self.config.daily_grant_limit,
            });
        }

        let duration = duration.unwrap_or_else(|| self.config.default_grant_duration());
        let record =
            TemporaryAccessGrant::new(viewer_id, target_id, reason, kind, fields, duration, now);
        state.grants.insert(record.access_id, record.clone());
        state.issued_today.insert(viewer_id, (today, count + 1));

        tracing::info!(
            access_id = %record.access_id,
            viewer_id = %viewer_id,
            target_id = %target_id,
            kind = kind.as_str(),
            expires_at = %record.expires_at,
            "temporary access granted"
        );
        Ok(record)
    }

    /// Issue an emergency grant: fixed two-hour duration, reason prefixed
    /// with the emergency type tag for audit legibility.
    pub fn grant_emergency(
        &self,
        viewer_id: Uuid,
        target_id: Uuid,
        reason: &str,
        emergency_type: &str,
        fields: HashSet<SensitiveField>,
    ) -> Result<TemporaryAccessGrant, AccessError> {
        self.grant(
            viewer_id,
            target_id,
            format!("[{emergency_type}] {reason}"),
            AccessKind::EmergencyAccess,
            Some(Duration::seconds(EMERGENCY_ACCESS_SECS as i64)),
            fields,
        )
    }

    /// Union of live-grant fields for the viewer/target pair, or `None` when
    /// no live grant exists. When several live grants cover the same field,
    /// the most recently granted record supplies its [`FieldSource`].
    pub fn check_access(&self, viewer_id: Uuid, target_id: Uuid) -> Option<ElevatedAccess> {
        let now = self.clock.now();
        let state = self.lock();

        let mut live: Vec<&TemporaryAccessGrant> = state
            .grants
            .values()
            .filter(|g| g.viewer_id == viewer_id && g.target_id == target_id && g.is_live(now))
            .collect();
        if live.is_empty() {
            return None;
        }
        live.sort_by_key(|g| g.granted_at);

        let mut access = ElevatedAccess::default();
        for grant in live {
            for field in &grant.access_fields {
                access.fields.insert(*field);
                access.field_sources.insert(
                    *field,
                    FieldSource {
                        access_id: grant.access_id,
                        reason: grant.reason.clone(),
                        expires_at: grant.expires_at,
                    },
                );
            }
        }
        Some(access)
    }

    /// Revoke a grant. Idempotent: unknown ids and already-revoked records
    /// are a no-op, and the first revocation's metadata is kept. The record
    /// itself stays in the ledger for the retention window.
    pub fn revoke(&self, access_id: Uuid, kind: RevokeKind) {
        let now = self.clock.now();
        let mut state = self.lock();
        let Some(grant) = state.grants.get_mut(&access_id) else {
            return;
        };
        if grant.revoked {
            return;
        }
        grant.revoked = true;
        grant.revoked_at = Some(now);
        grant.revoke_kind = Some(kind);
        tracing::info!(
            access_id = %access_id,
            viewer_id = %grant.viewer_id,
            revoke_kind = kind.as_str(),
            "temporary access revoked"
        );
    }

    /// True when the viewer has used up the daily grant budget.
    pub fn check_rate_limit(&self, viewer_id: Uuid, daily_limit: u32) -> bool {
        let today = self.clock.now().date_naive();
        let state = self.lock();
        match state.issued_today.get(&viewer_id) {
            Some((day, n)) if *day == today => *n >= daily_limit,
            _ => false,
        }
    }

    /// Look up a grant record, live or not.
    pub fn find(&self, access_id: Uuid) -> Option<TemporaryAccessGrant> {
        self.lock().grants.get(&access_id).cloned()
    }

    /// Drop records whose retention window after expiry or revocation has
    /// elapsed, and stale day counters. Returns the number of records
    /// removed. Liveness checks never depend on this running; it only bounds
    /// memory.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let retention = self.config.revoked_retention();
        let mut state = self.lock();

        let before = state.grants.len();
        state.grants.retain(|_, g| {
            if g.is_live(now) {
                return true;
            }
            let ended = match (g.revoked, g.revoked_at) {
                (true, Some(at)) => at,
                _ => g.expires_at,
            };
            now < ended + retention
        });
        let today = now.date_naive();
        state.issued_today.retain(|_, (day, _)| *day == today);

        let removed = before - state.grants.len();
        if removed > 0 {
            tracing::debug!(removed, "swept expired temporary access records");
        }
        removed
    }

    /// Start the periodic background sweep. Runs until [`shutdown`] is
    /// called.
    ///
    /// [`shutdown`]: AccessLedger::shutdown
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let ledger = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(ledger.config.sweep_interval());
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval fires immediately
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = ledger.cancel.cancelled() => break,
                    _ = tick.tick() => {
                        ledger.sweep();
                    }
                }
            }
            tracing::debug!("access ledger sweeper stopped");
        })
    }

    /// Stop the background sweep.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        // a poisoned lock means a panic mid-mutation; take the state as-is
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for AccessLedger {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
