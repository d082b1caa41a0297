use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::identity::IdentityContext;

/// Which identifier partitions usage records for a limited command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitScope {
    Platform,
    Channel,
    User,
}

impl fmt::Display for LimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitScope::Platform => write!(f, "platform"),
            LimitScope::Channel => write!(f, "channel"),
            LimitScope::User => write!(f, "user"),
        }
    }
}

/// A limit threshold that is either fixed or computed fresh per invocation
/// from the identity context.
#[derive(Clone)]
pub enum LimitValue {
    Fixed(i64),
    Computed(Arc<dyn Fn(&IdentityContext) -> i64 + Send + Sync>),
}

impl LimitValue {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&IdentityContext) -> i64 + Send + Sync + 'static,
    {
        LimitValue::Computed(Arc::new(f))
    }

    /// Resolves the threshold for this invocation. Negative values come from
    /// misconfiguration and clamp to 0, which means "disabled".
    pub fn resolve(&self, ctx: &IdentityContext) -> u32 {
        let raw = match self {
            LimitValue::Fixed(v) => *v,
            LimitValue::Computed(f) => f(ctx),
        };
        raw.clamp(0, u32::MAX as i64) as u32
    }
}

impl Default for LimitValue {
    fn default() -> Self {
        LimitValue::Fixed(0)
    }
}

impl From<i64> for LimitValue {
    fn from(v: i64) -> Self {
        LimitValue::Fixed(v)
    }
}

impl From<u32> for LimitValue {
    fn from(v: u32) -> Self {
        LimitValue::Fixed(v as i64)
    }
}

impl fmt::Debug for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Fixed(v) => write!(f, "Fixed({v})"),
            LimitValue::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// Raw limit configuration attached to a command node. Both thresholds
/// default to 0 (disabled) so an unconfigured command imposes no limit.
#[derive(Debug, Clone)]
pub struct CommandLimitConfig {
    pub scope: LimitScope,
    pub max_day_usage: LimitValue,
    pub min_interval: LimitValue,
}

impl CommandLimitConfig {
    /// Resolves both thresholds against the current identity context.
    pub fn resolve(&self, ctx: &IdentityContext) -> CommandLimits {
        CommandLimits {
            scope: self.scope,
            max_day_usage: self.max_day_usage.resolve(ctx),
            min_interval_secs: self.min_interval.resolve(ctx),
        }
    }
}

impl Default for CommandLimitConfig {
    fn default() -> Self {
        Self {
            scope: LimitScope::User,
            max_day_usage: LimitValue::default(),
            min_interval: LimitValue::default(),
        }
    }
}

/// Per-invocation resolved thresholds. 0 means disabled, never "zero calls".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLimits {
    pub scope: LimitScope,
    pub max_day_usage: u32,
    pub min_interval_secs: u32,
}

impl CommandLimits {
    /// True when at least one dimension is enabled, i.e. the chain walk
    /// should stop at this command level.
    pub fn is_active(&self) -> bool {
        self.max_day_usage > 0 || self.min_interval_secs > 0
    }
}
