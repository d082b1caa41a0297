use serde::{Deserialize, Serialize};

/// Which identifier a rule entry matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSubject {
    User,
    Channel,
}

/// What a matching rule does: `Block` denies silently, `Ignore` bypasses all
/// limit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Block,
    Ignore,
}

/// One configured override for a specific user or channel. Entries are
/// consumed in order at startup; a later entry for the same
/// `(subject, content)` pair overwrites an earlier one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(rename = "type")]
    pub subject: RuleSubject,
    pub content: String,
    pub action: RuleAction,
}
