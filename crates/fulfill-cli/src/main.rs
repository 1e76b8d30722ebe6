use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use fulfill_core::{Coordinator, CoordinatorConfig, FulfillError};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

/// Scripted fulfillment center demo.
#[derive(Parser)]
#[command(name = "fulfill", about = "Fulfillment center simulation")]
struct Cli {
    /// Event log file (overrides FULFILL_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Processing time per item in milliseconds (overrides FULFILL_PROCESSING_MS)
    #[arg(long)]
    processing_ms: Option<u64>,
    /// Idle poll interval in milliseconds (overrides FULFILL_POLL_MS)
    #[arg(long)]
    poll_ms: Option<u64>,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> Result<CoordinatorConfig, FulfillError> {
        let mut config = CoordinatorConfig::from_env()?;
        if let Some(path) = &self.output {
            config = config.with_output_path(path);
        }
        if let Some(ms) = self.processing_ms {
            config = config.with_processing_time(Duration::from_millis(ms));
        }
        if let Some(ms) = self.poll_ms {
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let coord = match Coordinator::open(config) {
        Ok(coord) => coord,
        Err(e) => {
            eprintln!("Error creating fulfillment center: {e}");
            return ExitCode::FAILURE;
        }
    };

    run_demo(&coord).await;

    let snapshot = coord.snapshot().await;
    coord.shutdown().await;

    if cli.json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to encode snapshot: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}

/// The classic timeline. Waits are written for a 10 s processing time and scaled
/// to whatever is configured.
async fn run_demo(coord: &Coordinator) {
    let scale = coord.config().processing_time.as_secs_f64() / 10.0;
    let wait = |secs: f64| sleep(Duration::from_secs_f64(secs * scale));

    coord.log("Fulfillment Center Started");

    coord.log("--- Scenario 1: Standard Items ---");
    coord.submit_standard().await;
    coord.submit_standard().await;
    wait(0.5).await;
    coord.report_status().await;

    coord.log("--- Scenario 2: Add Worker ---");
    add_worker(coord).await;
    wait(0.5).await;
    coord.report_status().await;

    coord.log("--- Scenario 3: Add Priority Item ---");
    coord.submit_priority().await;
    coord.submit_standard().await;
    wait(0.5).await;
    coord.report_status().await;

    coord.log("--- Scenario 4: Add More Workers ---");
    add_worker(coord).await;
    add_worker(coord).await;
    wait(0.5).await;
    coord.report_status().await;

    coord.log("--- Waiting for items to complete ---");
    wait(12.0).await;
    coord.report_status().await;

    coord.log("--- Scenario 5: Add Mixed Items ---");
    coord.submit_priority().await;
    coord.submit_standard().await;
    coord.submit_priority().await;
    coord.submit_standard().await;
    wait(0.5).await;
    coord.report_status().await;

    coord.log("--- Scenario 6: Remove Worker ---");
    wait(2.0).await;
    coord.remove_worker().await;
    wait(0.5).await;
    coord.report_status().await;

    coord.log("--- Final Wait ---");
    wait(15.0).await;
    coord.report_status().await;

    coord.log("=== Simulation Complete ===");
}

async fn add_worker(coord: &Coordinator) {
    if let Err(e) = coord.add_worker().await {
        tracing::warn!("could not add worker: {e}");
    }
}
