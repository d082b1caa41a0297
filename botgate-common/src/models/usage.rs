use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Usage state for one `(scope, identifier, command)` record key.
///
/// A `None` field means that dimension has never been evaluated for this key.
/// `daily_uses_left == Some(0)` blocks further calls until the next reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageRecord {
    pub cooldown_expires_at: Option<DateTime<Local>>,
    pub daily_uses_left: Option<u32>,
    pub daily_reset_at: Option<DateTime<Local>>,
}
