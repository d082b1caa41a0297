// File: src/services/scope.rs

use botgate_common::models::{IdentityContext, LimitScope};

/// Derives the identifier that partitions usage records for `scope`.
///
/// Returns `None` when the context has no such identifier (e.g. a private
/// message has no channel); the caller must skip the limit at that command
/// level, neither denying nor recording anything.
pub fn derive_scope_key(ctx: &IdentityContext, scope: LimitScope) -> Option<String> {
    match scope {
        LimitScope::User => ctx.user_id.clone(),
        LimitScope::Channel => ctx.channel_id.clone(),
        LimitScope::Platform => ctx.platform.clone(),
    }
}
