//! Per-request context.

use pairledger_inventory::unit::DEFAULT_ACTOR;

/// Who is making the request, taken from the `x-actor` header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActorContext {
    actor: Option<String>,
}

impl ActorContext {
    pub fn new(actor: Option<String>) -> Self {
        Self {
            actor: actor.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
        }
    }

    /// Actor name, if the request carried one.
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Actor name, or the default attribution.
    pub fn actor_or_default(&self) -> &str {
        self.actor().unwrap_or(DEFAULT_ACTOR)
    }
}
