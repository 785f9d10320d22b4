//! insight-hub command-line client
//!
//! Entry point: load configuration, set up logging, run one subcommand.

use std::process::ExitCode;

use clap::Parser;
use mimalloc::MiMalloc;
use tracing::debug;

use insight_hub::{
    commands,
    config::{AppConfig, Cli},
    telemetry,
};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env (if present) before clap reads env-backed flags
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init(&config.logging);
    debug!(
        base_url = %config.api.base_url,
        top_k = config.api.top_k,
        strict = config.api.strict,
        "Configuration loaded"
    );

    let mut stdout = std::io::stdout();
    match commands::run(&cli, &config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
