// File: src/config.rs

use serde::{Deserialize, Serialize};

use botgate_common::models::RuleEntry;
use botgate_common::Error;

/// Startup configuration for the admission service, as loaded by the host's
/// plugin glue. `send_hint` controls whether denial text is surfaced to the
/// invoking user or suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    #[serde(default = "default_send_hint")]
    pub send_hint: bool,
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

fn default_send_hint() -> bool {
    true
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            send_hint: true,
            rules: Vec::new(),
        }
    }
}

impl AdmissionConfig {
    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }
}
