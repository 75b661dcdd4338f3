mod commands;
mod presenter;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lifeline_core::{
    load_config, validate_config, Credential, DispatchClient, HttpDispatchClient, RequestKind,
    SanitizedConfig, TrackedRequest,
};

#[derive(Parser)]
#[command(name = "lifeline", version, about = "Emergency ambulance dispatch client")]
struct Cli {
    /// Path to the configuration file (falls back to $LIFELINE_CONFIG,
    /// then ./config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track a booking or report until it resolves
    Track {
        kind: KindArg,
        /// Server-assigned request id
        id: String,
    },
    /// File a new incident report and track it
    Report {
        #[arg(long)]
        latitude: f64,
        #[arg(long)]
        longitude: f64,
        /// What happened
        #[arg(long)]
        description: Option<String>,
        /// File the report without waiting for an ambulance assignment
        #[arg(long)]
        no_track: bool,
    },
    /// Cancel a pending booking or report
    Cancel { kind: KindArg, id: String },
    /// List your past bookings or reports
    History {
        kind: KindArg,
        /// Print the raw entries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Booking,
    Report,
}

impl From<KindArg> for RequestKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Booking => RequestKind::Booking,
            KindArg::Report => RequestKind::Report,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,lifeline_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Determine config path
    let config_path = cli
        .config
        .or_else(|| std::env::var("LIFELINE_CONFIG").map(PathBuf::from).ok())
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    // Load configuration
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    info!(config = ?SanitizedConfig::from(&config), "configuration loaded");

    let token = config
        .auth
        .token
        .clone()
        .context("No access token configured; set [auth] token or LIFELINE_AUTH_TOKEN")?;
    let credential = Credential::try_new(token)?;

    let client: Arc<dyn DispatchClient> =
        Arc::new(HttpDispatchClient::new(config.api.clone()).context("Failed to build HTTP client")?);
    info!(backend = client.name(), base_url = %config.api.base_url, "dispatch client ready");

    match cli.command {
        Command::Track { kind, id } => {
            let request = TrackedRequest::new(id, kind.into());
            commands::track(client, credential, &config, request).await
        }
        Command::Report {
            latitude,
            longitude,
            description,
            no_track,
        } => {
            commands::report(
                client,
                credential,
                &config,
                latitude,
                longitude,
                description,
                no_track,
            )
            .await
        }
        Command::Cancel { kind, id } => {
            let request = TrackedRequest::new(id, kind.into());
            commands::cancel(client, credential, request).await
        }
        Command::History { kind, json } => {
            commands::history(client, credential, kind.into(), json).await
        }
    }
}
