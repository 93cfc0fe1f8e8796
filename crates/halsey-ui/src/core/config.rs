//! Panel configuration and timing defaults.
//!
//! # Design
//! - The panel is served same-origin, so the base URL is just the page origin.
//! - Every interval lives in [`Timings`] so tests and the browser share one source.

/// Intervals used across the engine, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Quiet period before a text field writes.
    pub debounce_ms: u32,
    /// How long a success indicator stays visible.
    pub success_decay_ms: u32,
    /// Wait between restart acceptance and the first status poll.
    pub restart_grace_ms: u32,
    /// Wait between restart status polls.
    pub restart_poll_interval_ms: u32,
    /// Restart sessions give up after this long.
    pub restart_timeout_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            success_decay_ms: 2_000,
            restart_grace_ms: 3_000,
            restart_poll_interval_ms: 3_000,
            restart_timeout_ms: 300_000,
        }
    }
}

/// Log level used when the page does not override it.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolved panel configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    /// Origin requests are sent to, without a trailing slash.
    pub base_url: String,
    /// `EnvFilter` directive for browser logging.
    pub log_level: String,
    /// Engine intervals.
    pub timings: Timings,
}

impl PanelConfig {
    /// Build from the page origin and an optional `data-log-level` override.
    #[must_use]
    pub fn from_page(origin: &str, log_level: Option<&str>) -> Self {
        let log_level = log_level
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(DEFAULT_LOG_LEVEL);
        Self {
            base_url: origin.trim_end_matches('/').to_string(),
            log_level: log_level.to_string(),
            timings: Timings::default(),
        }
    }

    /// Absolute URL for a settings path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
