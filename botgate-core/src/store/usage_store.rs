// File: src/store/usage_store.rs

use chrono::{DateTime, Duration, Local, LocalResult, TimeZone};
use dashmap::DashMap;
use tracing::debug;

use botgate_common::models::{CommandLimits, LimitScope, UsageRecord};

/// Outcome of one atomic check-and-commit against a record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    Admitted,
    /// Denied by the cooldown check; seconds remaining, rounded up.
    OnCooldown { remaining_secs: i64 },
    /// Denied because the daily quota for the current window is spent.
    QuotaExhausted,
}

/// In-memory map of usage records, keyed by composite record identifier.
///
/// Records are created on first evaluation and never evicted. The dashmap
/// entry API holds the shard lock for the whole cooldown-check → quota-check
/// → commit sequence, so concurrent calls on the same key serialize and a
/// quota with one unit left admits exactly one of them.
#[derive(Debug, Default)]
pub struct UsageStore {
    records: DashMap<String, UsageRecord>,
}

/// Builds the composite record key. The command's internal `.` hierarchy
/// separator is re-delimited to `/` so a subcommand like `remind.me` can
/// never collide with a top-level command keyed under a dotted name.
pub fn record_key(scope: LimitScope, scope_key: &str, command_name: &str) -> String {
    format!("{}:{}:{}", scope, scope_key, command_name.replace('.', "/"))
}

impl UsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates the cooldown and quota checks for `key` under `limits` and,
    /// if both pass, commits the new cooldown expiry and quota decrement.
    /// A threshold of 0 disables that dimension entirely.
    pub fn check_and_commit(
        &self,
        key: &str,
        limits: &CommandLimits,
        now: DateTime<Local>,
    ) -> AdmitOutcome {
        let mut record = self.records.entry(key.to_string()).or_default();

        if limits.min_interval_secs > 0 {
            if let Some(expires) = record.cooldown_expires_at {
                if now < expires {
                    let remaining_ms = (expires - now).num_milliseconds();
                    let remaining_secs = (remaining_ms + 999) / 1000;
                    debug!("'{}' on cooldown for another {}s", key, remaining_secs);
                    return AdmitOutcome::OnCooldown { remaining_secs };
                }
            }
        }

        if limits.max_day_usage > 0 {
            let window_expired = match record.daily_reset_at {
                None => true,
                Some(deadline) => now > deadline,
            };
            if window_expired {
                record.daily_reset_at = Some(next_local_midnight(now));
                record.daily_uses_left = Some(limits.max_day_usage);
            }
            if record.daily_uses_left == Some(0) {
                debug!("'{}' daily quota exhausted", key);
                return AdmitOutcome::QuotaExhausted;
            }
        }

        if limits.min_interval_secs > 0 {
            record.cooldown_expires_at =
                Some(now + Duration::seconds(limits.min_interval_secs as i64));
        }
        if limits.max_day_usage > 0 {
            if let Some(uses) = record.daily_uses_left.as_mut() {
                *uses = uses.saturating_sub(1);
            }
        }
        AdmitOutcome::Admitted
    }

    /// Snapshot of one record, for diagnostics and tests.
    pub fn get(&self, key: &str) -> Option<UsageRecord> {
        self.records.get(key).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The start of the next local calendar day. Daily quotas reset here, not on
/// a rolling 24h window. If the local timezone has no valid midnight (DST
/// gap), fall back to 24h from now rather than failing the decision.
fn next_local_midnight(now: DateTime<Local>) -> DateTime<Local> {
    let tomorrow = match now.date_naive().succ_opt() {
        Some(d) => d,
        None => return now + Duration::days(1),
    };
    let midnight = match tomorrow.and_hms_opt(0, 0, 0) {
        Some(naive) => naive,
        None => return now + Duration::days(1),
    };
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => now + Duration::days(1),
    }
}
