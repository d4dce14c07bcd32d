//! View configuration.

use std::time::Duration;

/// Origin of the hosted todo API.
pub const DEFAULT_API_URL: &str = "https://project-name-backend-todo-fetchapi.onrender.com";

/// How long a success status stays visible.
pub const DEFAULT_STATUS_CLEAR_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub base_url: String,
    pub status_clear_delay: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            status_clear_delay: DEFAULT_STATUS_CLEAR_DELAY,
        }
    }
}

impl ViewConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_status_clear_delay(mut self, delay: Duration) -> Self {
        self.status_clear_delay = delay;
        self
    }
}
