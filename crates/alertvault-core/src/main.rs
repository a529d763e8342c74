//! AlertVault CLI
//!
//! Runs the webhook receiver and offers offline tools for saved payloads.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use alertvault::api::HttpServer;
use alertvault::models::AlertPayload;
use alertvault::publisher::AlertPublisher;
use alertvault::storage::S3Store;
use alertvault::{telemetry, Config};

/// AlertVault - archive email security alerts to S3
#[derive(Parser)]
#[command(name = "alertvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ALERTVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook receiver
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// HTTP port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the report a saved webhook payload would produce
    Render {
        /// JSON payload file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Archive a saved webhook payload once
    Publish {
        /// JSON payload file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    telemetry::init(&config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Serve { host, port } => run_serve(config, host, port).await,
        Commands::Render { input } => run_render(&input),
        Commands::Publish { input } => run_publish(config, &input).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_publisher(config: &Config) -> anyhow::Result<AlertPublisher> {
    let store = S3Store::new(config.storage.clone()).context("failed to build S3 client")?;
    Ok(AlertPublisher::new(Arc::new(store)))
}

fn read_payload(path: &Path) -> anyhow::Result<AlertPayload> {
    let body = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(AlertPayload::from_slice(&body)?)
}

async fn run_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!(
        bucket = %config.storage.bucket,
        region = %config.storage.region,
        "Starting AlertVault receiver on {}",
        config.server.bind_addr()
    );

    let publisher = build_publisher(&config)?;
    HttpServer::new(publisher, config.server.surface_storage_errors)
        .serve(&config.server.bind_addr())
        .await?;

    Ok(())
}

fn run_render(input: &Path) -> anyhow::Result<()> {
    let payload = read_payload(input)?;
    let (key, envelope) = AlertPublisher::preview(&payload.event);

    println!("key: {key}");
    println!("{}", envelope.text);
    Ok(())
}

async fn run_publish(config: Config, input: &Path) -> anyhow::Result<()> {
    let payload = read_payload(input)?;
    let publisher = build_publisher(&config)?;

    let outcome = publisher.publish(&payload.event).await?;
    println!("{outcome}");

    if outcome.is_stored() {
        Ok(())
    } else {
        anyhow::bail!("alert was not archived")
    }
}
