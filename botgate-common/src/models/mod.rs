// File: botgate-common/src/models/mod.rs

pub mod command;
pub mod identity;
pub mod limits;
pub mod rule;
pub mod usage;

pub use command::{CommandNode, CommandSpec};
pub use identity::IdentityContext;
pub use limits::{CommandLimitConfig, CommandLimits, LimitScope, LimitValue};
pub use rule::{RuleAction, RuleEntry, RuleSubject};
pub use usage::UsageRecord;
