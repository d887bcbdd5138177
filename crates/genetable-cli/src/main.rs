//! genetable CLI - Main entry point

use clap::Parser;
use genetable_cli::Cli;
use genetable_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Settings from a local .env apply unless already set in the environment
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Handle markdown help generation
    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    // Logs go to stderr; stdout carries records
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("genetable")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // Ignore errors as the CLI should work without logging
    let _ = init_logging(&log_config);

    let result = match cli.into_run_config() {
        Ok(config) => genetable_cli::run(&config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "Run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
