//! testdeck – command line client for the test workbench.
//!
//! Startup order:
//! 1. Parse arguments and configuration from environment variables.
//! 2. Initialise tracing.
//! 3. Build the API client and dispatch the subcommand.

mod cli;
mod commands;

use clap::Parser;
use testdeck_client::{ApiClient, ClientConfig};
use tracing::debug;

use crate::cli::Cli;

const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = ClientConfig::from_env();
    if let Some(base) = &cli.api_base {
        cfg = cfg.with_api_base(base);
    }

    init_tracing(cli.log_json);
    debug!(api_base = %cfg.api_base, "configuration loaded");

    let client = ApiClient::new(&cfg)?;
    let ok = commands::dispatch(cli.command, client, &cfg).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// `RUST_LOG` wins, then `TESTDECK_LOG`, then `info`.
fn init_tracing(json: bool) {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => {
            let level =
                std::env::var("TESTDECK_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
            match level.parse::<tracing_subscriber::EnvFilter>() {
                Ok(f) => f,
                Err(e) => {
                    eprintln!(
                        "WARN: TESTDECK_LOG='{level}' is not a valid tracing filter ({e}); \
                         falling back to '{DEFAULT_LOG_FILTER}'"
                    );
                    tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)
                }
            }
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
