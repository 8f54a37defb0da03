//! Backend Config

use std::time::Duration;

use clap::Args;

/// Storefront backend settings.
#[derive(Debug, Args)]
pub struct BackendConfig {
    /// Storefront base URL
    #[arg(long, env = "MAVUNO_BASE_URL")]
    pub base_url: String,

    /// Anti-forgery token sent with every mutating request
    #[arg(long, env = "MAVUNO_CSRF_TOKEN", hide_env_values = true)]
    pub csrf_token: String,

    /// ISO 4217 code prices are quoted in
    #[arg(long, env = "MAVUNO_CURRENCY", default_value = "KES")]
    pub currency: String,

    /// Seconds to wait for the backend before giving up
    #[arg(long, env = "MAVUNO_REQUEST_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub request_timeout_seconds: u64,
}

impl BackendConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
