// ppe-report-service/src/main.rs

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ppe_report_service::{ReportPipeline, ReportRequest, Settings};

/// Generate a PPE report PDF from a JSON request file.
#[derive(Parser, Debug)]
#[command(name = "ppe-report", version, about)]
struct Cli {
    /// Path to a JSON file containing { report_type, report_data, filename? }
    input: PathBuf,

    /// Output directory override (defaults to the configured directory)
    #[arg(short, long)]
    output_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load configuration")?;
    if let Some(dir) = cli.output_dir {
        settings.output.dir = dir;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.service.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        service = %settings.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting report generation"
    );

    let raw = tokio::fs::read_to_string(&cli.input)
        .await
        .with_context(|| format!("Failed to read request file {}", cli.input.display()))?;
    let request: ReportRequest =
        serde_json::from_str(&raw).context("Invalid report request JSON")?;

    let pipeline = ReportPipeline::new(settings);
    let path = pipeline.generate_report(request).await?;

    println!("{}", path.display());
    Ok(())
}
