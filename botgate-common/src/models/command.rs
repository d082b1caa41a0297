use std::sync::Arc;

use crate::models::identity::IdentityContext;
use crate::models::limits::{CommandLimitConfig, CommandLimits};

/// A node in the host's command hierarchy, as seen by admission control.
///
/// `name()` is the full dot-hierarchical name (e.g. `"remind.me"`); `parent()`
/// walks toward the root; `limits()` resolves this node's limit configuration
/// against the current identity context, fresh per invocation.
pub trait CommandNode: Send + Sync {
    fn name(&self) -> &str;
    fn parent(&self) -> Option<&dyn CommandNode>;
    fn limits(&self, ctx: &IdentityContext) -> CommandLimits;
}

/// Concrete command tree node. Children hold an `Arc` to their parent, so a
/// tree is assembled leaf-last without cyclic ownership.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    name: String,
    parent: Option<Arc<CommandSpec>>,
    limits: CommandLimitConfig,
}

impl CommandSpec {
    /// A root command with no limits configured.
    pub fn root(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            parent: None,
            limits: CommandLimitConfig::default(),
        })
    }

    /// A subcommand of `parent`; its full name is `parent.name` joined with
    /// the `.` hierarchy separator.
    pub fn subcommand(parent: &Arc<CommandSpec>, name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: format!("{}.{}", parent.name, name),
            parent: Some(parent.clone()),
            limits: CommandLimitConfig::default(),
        })
    }

    /// Replaces this node's limit configuration. Intended for use while the
    /// tree is being assembled, before the node gains children.
    pub fn with_limits(self: Arc<Self>, limits: CommandLimitConfig) -> Arc<Self> {
        Arc::new(Self {
            name: self.name.clone(),
            parent: self.parent.clone(),
            limits,
        })
    }
}

impl CommandNode for CommandSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<&dyn CommandNode> {
        self.parent.as_deref().map(|p| p as &dyn CommandNode)
    }

    fn limits(&self, ctx: &IdentityContext) -> CommandLimits {
        self.limits.resolve(ctx)
    }
}
