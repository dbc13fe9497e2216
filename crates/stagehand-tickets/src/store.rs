//! TTL-bound ticket store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

/// Bytes of entropy per ticket (hex-encoded to twice this length).
const TICKET_BYTES: usize = 16;

/// Issues and validates opaque session tickets.
///
/// Each ticket lives for a fixed TTL from issuance; it is never renewed,
/// so validity ends at the absolute deadline regardless of use. Expired
/// entries are dropped lazily — on the validation that observes them and
/// in a sweep on each issuance — so the map stays bounded by the ticket
/// rate within one TTL window.
#[derive(Clone)]
pub struct TicketStore {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, Instant>>>,
}

impl TicketStore {
    /// Create a store whose tickets expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Generate a fresh ticket and register it with the full TTL.
    ///
    /// Returns the raw token; the caller hands it to the client as a
    /// cookie. Marking the ticket in the cooldown cache is the caller's
    /// job — the store knows nothing about cooldown.
    pub fn issue(&self) -> String {
        let ticket = generate_ticket();
        let deadline = Instant::now() + self.ttl;

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, expires_at| *expires_at > Instant::now());
        entries.insert(ticket.clone(), deadline);

        debug!(tickets = entries.len(), "ticket issued");
        ticket
    }

    /// Whether `ticket` is non-empty and currently present in the store.
    ///
    /// Existence check only — no value semantics. Empty input is always
    /// invalid and never an error.
    pub fn validate(&self, ticket: &str) -> bool {
        if ticket.is_empty() {
            return false;
        }

        let expired = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(ticket) {
                Some(expires_at) if *expires_at > Instant::now() => return true,
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            entries.remove(ticket);
        }
        false
    }
}

/// Generate a random hex ticket with `TICKET_BYTES` bytes of entropy.
fn generate_ticket() -> String {
    use rand::Rng;
    let mut bytes = [0u8; TICKET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}
