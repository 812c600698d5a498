//! Tripplan Worker - itinerary distribution and routing service
//!
//! Connects to NATS and answers itinerary planning requests from the trip
//! wizard, or plans a single trip from a file with `plan`.

mod cli;
mod config;
mod defaults;
mod error;
mod handlers;
mod services;
mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::services::routing::create_routing_service_with_fallback;
use crate::services::travel_time::TravelTimeOracle;
use crate::types::TripRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR").unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "worker.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - stdout (stderr for `plan`, whose stdout is the result) and file
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tripplan_worker=debug".into()),
    );
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    match cli.command {
        Some(Command::Plan { .. }) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    // Load configuration
    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    match cli.command {
        Some(Command::Plan { input, mode, pretty }) => run_plan(&config, &input, mode, pretty).await,
        Some(Command::Serve) | None => serve(&config).await,
    }
}

async fn serve(config: &config::Config) -> Result<()> {
    info!("Starting Tripplan Worker...");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    // Start message handlers
    let handler_result = handlers::start_handlers(nats_client, config).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn run_plan(
    config: &config::Config,
    input: &std::path::Path,
    mode: Option<types::TravelMode>,
    pretty: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("cannot read trip request {}", input.display()))?;
    let mut request: TripRequest = serde_json::from_str(&raw)
        .with_context(|| format!("invalid trip request in {}", input.display()))?;
    if let Some(mode) = mode {
        request.mode = mode;
    }

    let routing = create_routing_service_with_fallback(&config.routing).await;
    let oracle = Arc::new(TravelTimeOracle::new(routing));

    let view = handlers::itinerary::plan_itinerary(oracle, &request)
        .await
        .context("cannot plan trip")?;

    let output = if pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{}", output);

    Ok(())
}
