//! Mavuno storefront command line

use std::{
    io::{self, Write},
    process::ExitCode,
};

use tracing::error;

use mavuno::money;
use mavuno_app::context::{AppContext, CsrfToken, SessionContext};

use crate::config::CliConfig;

mod commands;
mod config;
mod observability;
mod prompt;

/// Mavuno command line entry point
#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    if let Err(init_error) = observability::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{init_error}");
        }

        return ExitCode::FAILURE;
    }

    let app = match app_context(&config) {
        Ok(app) => app,
        Err(setup_error) => {
            error!("failed to initialize app context: {setup_error}");

            return report(&setup_error.to_string());
        }
    };

    let mut stdout = io::stdout().lock();

    match commands::run(config.command, &app, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(command_error) => {
            error!("command failed: {command_error}");

            report(&command_error.notice().to_string())
        }
    }
}

fn app_context(config: &CliConfig) -> Result<AppContext, Box<dyn std::error::Error>> {
    let currency = money::currency(&config.backend.currency)?;

    let session = SessionContext::new(
        &config.backend.base_url,
        CsrfToken::new(config.backend.csrf_token.as_str()),
        currency,
    )?
    .with_request_timeout(config.backend.request_timeout());

    Ok(AppContext::from_session(session)?)
}

fn report(message: &str) -> ExitCode {
    if let Err(write_error) = writeln!(io::stderr().lock(), "{message}") {
        error!("could not write to stderr: {write_error}");
    }

    ExitCode::FAILURE
}
