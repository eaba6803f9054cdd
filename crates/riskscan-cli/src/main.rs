//! riskscan
//!
//! Scrapes a short description of each configured system, asks a language
//! model to classify its AI risk, and appends the answers to a CSV dataset.

use anyhow::Result;
use clap::Parser;
use riskscan_cli::{Cli, ScanConfig, ScanEvent, ScanRunner, SubjectStatus};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.log_json);

    // Load configuration
    let config = ScanConfig::load(&cli.config, &cli)?;
    config.validate()?;
    info!("Configuration loaded successfully");
    info!("Backend: {} ({})", config.model.backend, config.model.endpoint);
    info!("Model: {}", config.model.model);
    info!("Subjects: {}", config.subjects.len());

    let mut runner = ScanRunner::from_config(&config)?;
    let report = runner.run_with(&config.subjects, print_event).await;

    println!();
    println!(
        "Done. {} succeeded, {} failed. The results have been saved to: {}",
        report.succeeded(),
        report.failed(),
        report.destination
    );

    Ok(())
}

fn print_event(event: ScanEvent<'_>) {
    match event {
        ScanEvent::Started(subject) => {
            println!();
            println!("--- Processing: {} ---", subject.name);
        }
        ScanEvent::Finished(outcome) => match &outcome.status {
            SubjectStatus::Done { result, .. } => match serde_json::to_string_pretty(result) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("{:?} ({})", result, e),
            },
            SubjectStatus::Failed(e) => println!("[FAILED] {}: {}", outcome.subject.name, e),
        },
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("riskscan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("riskscan=info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
