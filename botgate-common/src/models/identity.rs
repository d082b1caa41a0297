use serde::{Deserialize, Serialize};

/// The identity a command invocation arrives under. Any of the three
/// identifiers may be missing depending on the transport (e.g. a private
/// message has no channel).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityContext {
    pub platform: Option<String>,
    pub channel_id: Option<String>,
    pub user_id: Option<String>,
}

impl IdentityContext {
    /// A message delivered in a channel on some platform.
    pub fn channel_message(platform: &str, channel_id: &str, user_id: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            channel_id: Some(channel_id.to_string()),
            user_id: Some(user_id.to_string()),
        }
    }

    /// A direct/private message: no channel identifier exists.
    pub fn private_message(platform: &str, user_id: &str) -> Self {
        Self {
            platform: Some(platform.to_string()),
            channel_id: None,
            user_id: Some(user_id.to_string()),
        }
    }
}
