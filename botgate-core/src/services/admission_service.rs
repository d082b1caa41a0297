// File: src/services/admission_service.rs

use std::sync::Arc;

use tracing::{debug, info};

use botgate_common::models::{CommandNode, IdentityContext, RuleAction, RuleEntry};

use crate::clock::{Clock, SystemClock};
use crate::config::AdmissionConfig;
use crate::services::rule_resolver::RuleResolver;
use crate::services::scope::derive_scope_key;
use crate::store::usage_store::{record_key, AdmitOutcome, UsageStore};

/// Outcome of one admission decision. A `Deny` with no hint is a silent
/// block; the hint, when present, is user-facing text explaining the denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { hint: Option<String> },
}

/// Decides, per command invocation, whether execution proceeds.
///
/// Rule overrides are consulted first; otherwise the command's parent chain
/// is walked for the nearest level carrying an active limit, and that level's
/// usage record decides. Only that one level is ever evaluated per call.
pub struct AdmissionService {
    rules: RuleResolver,
    store: UsageStore,
    clock: Arc<dyn Clock>,
    send_hint: bool,
}

impl AdmissionService {
    pub fn new(rule_entries: &[RuleEntry], send_hint: bool) -> Self {
        Self::with_clock(rule_entries, send_hint, Arc::new(SystemClock))
    }

    pub fn with_clock(
        rule_entries: &[RuleEntry],
        send_hint: bool,
        clock: Arc<dyn Clock>,
    ) -> Self {
        debug!("Initializing AdmissionService (send_hint={})", send_hint);
        Self {
            rules: RuleResolver::from_entries(rule_entries),
            store: UsageStore::new(),
            clock,
            send_hint,
        }
    }

    pub fn from_config(config: &AdmissionConfig) -> Self {
        Self::new(&config.rules, config.send_hint)
    }

    /// Pre-execution hook for the host's command dispatch.
    ///
    /// Returns `None` to proceed, `Some("")` to cancel silently, or
    /// `Some(text)` to cancel and show `text`. Hint text is surfaced only
    /// when the service was configured with `send_hint`.
    pub fn pre_execute(&self, ctx: &IdentityContext, command: &dyn CommandNode) -> Option<String> {
        match self.decide(ctx, command) {
            Decision::Allow => None,
            Decision::Deny { hint } => {
                if self.send_hint {
                    Some(hint.unwrap_or_default())
                } else {
                    Some(String::new())
                }
            }
        }
    }

    /// Computes the full decision, hint included, for one invocation.
    pub fn decide(&self, ctx: &IdentityContext, command: &dyn CommandNode) -> Decision {
        match self.rules.resolve(ctx) {
            Some(RuleAction::Block) => {
                info!("Rule table blocks invocation of '{}'", command.name());
                return Decision::Deny { hint: None };
            }
            Some(RuleAction::Ignore) => {
                debug!("Rule table exempts invocation of '{}'", command.name());
                return Decision::Allow;
            }
            None => {}
        }
        self.walk_chain(ctx, command)
    }

    /// Walks from the invoked command toward the root and evaluates the
    /// first level that both carries an active limit and has a derivable
    /// scope key. That level is terminal whether it admits or denies, so
    /// nested commands inherit a single effective limit.
    fn walk_chain(&self, ctx: &IdentityContext, command: &dyn CommandNode) -> Decision {
        let now = self.clock.now();
        let mut node: Option<&dyn CommandNode> = Some(command);
        while let Some(current) = node {
            let limits = current.limits(ctx);
            if limits.is_active() {
                if let Some(scope_key) = derive_scope_key(ctx, limits.scope) {
                    let key = record_key(limits.scope, &scope_key, current.name());
                    return match self.store.check_and_commit(&key, &limits, now) {
                        AdmitOutcome::Admitted => Decision::Allow,
                        AdmitOutcome::OnCooldown { remaining_secs } => Decision::Deny {
                            hint: Some(format!(
                                "Command {} is on cooldown. Please wait {}s.",
                                current.name(),
                                remaining_secs
                            )),
                        },
                        AdmitOutcome::QuotaExhausted => Decision::Deny {
                            hint: Some(format!(
                                "Command {} has reached its daily usage limit.",
                                current.name()
                            )),
                        },
                    };
                }
                debug!(
                    "No {} key available for '{}'; skipping this limit level",
                    limits.scope,
                    current.name()
                );
            }
            node = current.parent();
        }
        Decision::Allow
    }

    /// The backing store, exposed for host diagnostics.
    pub fn store(&self) -> &UsageStore {
        &self.store
    }
}
