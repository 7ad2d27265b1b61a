//! spec-harvest CLI
//!
//! Launches Chrome, runs one extraction against the given catalog page and prints
//! the records to stdout. Progress goes to the log on stderr.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use spec_harvest::{BrowserSession, ExtractConfig, LaunchOptions, SpecRecord};
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// One labelled block per record
    Text,
    /// A pretty-printed JSON array
    Json,
}

#[derive(Parser)]
#[command(name = "spec-harvest")]
#[command(version)]
#[command(about = "Extract item specifications from a catalog page", long_about = None)]
struct Cli {
    /// Website URL to extract from
    #[arg(long, value_name = "URL")]
    url: String,

    /// Run the browser without a window
    #[arg(long)]
    headless: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Global timeout in minutes
    #[arg(long, default_value = "30", value_name = "MINUTES")]
    timeout: u64,

    /// Timeout for each browser interaction in minutes
    #[arg(long, default_value = "1", value_name = "MINUTES")]
    action_timeout: u64,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = ExtractConfig::new(cli.url.as_str())
        .headless(cli.headless)
        .debug(cli.debug)
        .global_timeout(minutes(cli.timeout))
        .action_timeout(minutes(cli.action_timeout));

    let mut options = LaunchOptions::for_run(&config);
    if let Some(path) = cli.chrome_path {
        options = options.chrome_path(path);
    }

    log::info!("Initializing browser...");
    let browser = BrowserSession::launch(options).context("Failed to initialize browser")?;

    log::info!("Starting extraction from {}", cli.url);
    let records = spec_harvest::extract::run(&browser, config).context("Extraction failed")?;

    print_records(&records, cli.format)?;

    log::info!("Extraction completed successfully");
    Ok(())
}

/// `n` minutes, saturating instead of overflowing on absurd inputs
fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(60))
}

fn print_records(records: &[SpecRecord], format: Format) -> anyhow::Result<()> {
    match format {
        Format::Text => {
            for record in records {
                println!("{}", record);
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
            println!("{}", json);
        }
    }
    Ok(())
}
