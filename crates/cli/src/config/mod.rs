//! Command line configuration

use clap::Parser;

use crate::{
    commands::Command,
    config::{backend::BackendConfig, observability::LoggingConfig},
};

pub(crate) mod backend;
pub(crate) mod observability;

pub(crate) use observability::LogFormat;

/// Mavuno storefront command line
#[derive(Debug, Parser)]
#[command(name = "mavuno", about = "Mavuno farm storefront", long_about = None)]
pub struct CliConfig {
    /// Storefront backend settings.
    #[command(flatten)]
    pub backend: BackendConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
