//! Application state for the web server.

use std::sync::Arc;

use opsanalyst::Analyst;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The configured pipeline. Read-only after startup.
    pub analyst: Arc<Analyst>,
}

impl AppState {
    pub fn new(analyst: Arc<Analyst>) -> Self {
        Self { analyst }
    }

    /// Name of the configured provider, if any (for display).
    pub fn provider_name(&self) -> Option<String> {
        self.analyst.provider_name().map(str::to_string)
    }
}
