//! Process-local admin cooldown cache.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Marks tickets that must not be accepted by the diagnostics path.
///
/// Every ticket enters cooldown at issuance and never leaves it for the
/// lifetime of this process — there is no TTL and no unmark operation. A
/// ticket in cooldown stays blocked even while it remains valid in the
/// ticket store.
///
/// The cache is intentionally not backed by the shared store: it is a
/// single-process gate. See the crate docs for the scaling implications.
#[derive(Clone, Default)]
pub struct CooldownCache {
    entries: Arc<RwLock<HashSet<String>>>,
}

impl CooldownCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `ticket` in cooldown, permanently.
    pub fn mark(&self, ticket: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(ticket.to_string());
    }

    /// Whether `ticket` is in cooldown.
    pub fn is_in_cooldown(&self, ticket: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.contains(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_ticket_is_in_cooldown() {
        let cache = CooldownCache::new();
        assert!(!cache.is_in_cooldown("t1"));
        cache.mark("t1");
        assert!(cache.is_in_cooldown("t1"));
    }

    #[test]
    fn cooldown_never_clears() {
        let cache = CooldownCache::new();
        cache.mark("t1");
        // No unmark API exists; repeated checks stay true.
        for _ in 0..3 {
            assert!(cache.is_in_cooldown("t1"));
        }
    }

    #[test]
    fn clones_share_state() {
        let cache = CooldownCache::new();
        cache.clone().mark("t1");
        assert!(cache.is_in_cooldown("t1"));
    }
}
