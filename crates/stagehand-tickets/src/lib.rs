//! stagehand-tickets — session tickets and the admin cooldown gate.
//!
//! A ticket is an opaque random bearer token: validity is nothing more
//! than presence in the store before its TTL elapses. The cooldown cache
//! is a separate, process-local flag set that permanently bars a ticket
//! from the privileged diagnostics path.
//!
//! Both structures are `Clone` + `Send` + `Sync` (Arc-backed) and are
//! shared between request handlers without further locking protocol: a
//! ticket is written once at issuance and only read afterwards.
//!
//! # Scaling note
//!
//! Store and cooldown state live in this process only. Running multiple
//! worker instances requires sticky sessions (the proxy hashes on the
//! ticket cookie) — do not move cooldown into a shared store without
//! revisiting the gate semantics.

pub mod cooldown;
pub mod store;

pub use cooldown::CooldownCache;
pub use store::TicketStore;
