// File: src/services/rule_resolver.rs

use std::collections::HashMap;

use tracing::debug;

use botgate_common::models::{IdentityContext, RuleAction, RuleEntry, RuleSubject};

/// Immutable table of per-user / per-channel overrides, built once at
/// startup. A user-level match always wins over a channel-level match, so a
/// per-user exception punches through a blanket channel rule.
#[derive(Debug, Default)]
pub struct RuleResolver {
    table: HashMap<(RuleSubject, String), RuleAction>,
}

impl RuleResolver {
    /// Builds the table from the configured entries, in order. Duplicate
    /// `(subject, content)` entries resolve to the last one listed.
    pub fn from_entries(entries: &[RuleEntry]) -> Self {
        let mut table = HashMap::new();
        for entry in entries {
            table.insert((entry.subject, entry.content.clone()), entry.action);
        }
        debug!("RuleResolver initialized with {} entries", table.len());
        Self { table }
    }

    /// Exact-match lookup: `(user, user_id)` first, then
    /// `(channel, channel_id)`, otherwise no override.
    pub fn resolve(&self, ctx: &IdentityContext) -> Option<RuleAction> {
        if let Some(user_id) = &ctx.user_id {
            if let Some(action) = self.table.get(&(RuleSubject::User, user_id.clone())) {
                return Some(*action);
            }
        }
        if let Some(channel_id) = &ctx.channel_id {
            if let Some(action) = self.table.get(&(RuleSubject::Channel, channel_id.clone())) {
                return Some(*action);
            }
        }
        None
    }
}
