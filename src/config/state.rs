// Application state module
// Holds the process-wide state shared across connections

use std::sync::atomic::AtomicUsize;

use super::types::Config;

/// Application state
///
/// Constructed once at startup and shared behind an `Arc`. The configuration
/// is immutable for the life of the process; the connection counter is the
/// only mutable field.
pub struct AppState {
    pub config: Config,
    /// Number of currently open connections
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            active_connections: AtomicUsize::new(0),
        }
    }
}
