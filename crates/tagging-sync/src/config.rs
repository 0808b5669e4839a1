use std::time::Duration;

/// Timing and retry settings for the sync loop.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Delay between host readiness checks.
    pub host_poll_interval: Duration,
    /// Readiness checks allowed while the RPC session is unavailable.
    /// Checks made while the login prompt is showing are free.
    pub host_retries: u32,
    /// Delay between "is the core initialized" checks, and between retries
    /// of the initial snapshot request.
    pub init_poll_interval: Duration,
    /// Delay between the end of one update request and the start of the next.
    pub update_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            host_poll_interval: Duration::from_secs(1),
            host_retries: 10,
            init_poll_interval: Duration::from_secs(3),
            update_interval: Duration::from_secs(1),
        }
    }
}

impl SyncConfig {
    pub fn with_host_poll_interval(mut self, interval: Duration) -> Self {
        self.host_poll_interval = interval;
        self
    }

    pub fn with_host_retries(mut self, retries: u32) -> Self {
        self.host_retries = retries;
        self
    }

    pub fn with_init_poll_interval(mut self, interval: Duration) -> Self {
        self.init_poll_interval = interval;
        self
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Use `interval` for every wait. Handy for tests and fast local servers.
    pub fn with_uniform_interval(self, interval: Duration) -> Self {
        self.with_host_poll_interval(interval)
            .with_init_poll_interval(interval)
            .with_update_interval(interval)
    }
}
