//! stagehand-proxy — keeps the reverse proxy's upstream set in step with
//! observed worker health.
//!
//! The configurator renders a textual upstream block from the healthy
//! set, writes it to the proxy's include path only when the text actually
//! changed, and then asks the running proxy to reload. A cycle that
//! observes no change performs no I/O at all.

pub mod configurator;
pub mod render;

pub use configurator::{ProxyConfigurator, ProxyError};
pub use render::render_upstream;
