/// Re-export `Config` from `pulseboard-core` for use within this crate.
///
/// Environment parsing lives in `pulseboard-core` so integration tests can
/// build a configuration without touching the process environment.
pub use pulseboard_core::config::{Config, GoogleConfig, ServiceAccount};
