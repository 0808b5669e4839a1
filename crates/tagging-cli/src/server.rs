use clap::Args;
use std::time::Duration;
use tagging_deluge::DelugeConfig;

/// Connection flags shared by the live-server commands.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Deluge Web UI URL
    #[arg(long, default_value = "http://localhost:8112")]
    pub url: String,

    /// Deluge Web UI password
    #[arg(long)]
    pub password: Option<String>,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ServerArgs {
    pub fn config(&self) -> DelugeConfig {
        let mut config = DelugeConfig::default()
            .with_url(&self.url)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(password) = &self.password {
            config = config.with_password(password);
        }
        config
    }
}
