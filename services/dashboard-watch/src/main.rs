//! Dashboard Watch CLI
//!
//! Command-line interface for the event dashboard client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashboard_watch::events::{DateFilter, EventQuery};
use dashboard_watch::{list_events, load_config, run, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "dashboard-watch")]
#[command(about = "Event dashboard client with status polling and emergency alerts")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long)]
    server_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Poll status and show emergencies until interrupted (default)
    Watch,

    /// List events once, optionally filtered by date or type
    Events {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,

        #[arg(long)]
        day: Option<u32>,

        /// Event type, e.g. "Incendio"; "Todos" lists every type
        #[arg(long = "type", conflicts_with_all = ["year", "month", "day"])]
        event_type: Option<String>,
    },
}

fn event_query(
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    event_type: Option<String>,
) -> EventQuery {
    if let Some(event_type) = event_type {
        return EventQuery::by_type(event_type);
    }
    if year.is_none() && month.is_none() && day.is_none() {
        return EventQuery::All;
    }
    EventQuery::DateRange(DateFilter { year, month, day })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, server_url={:?}, log_level={:?}",
        args.config,
        args.server_url,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(server_url) = args.server_url {
        config.server.base_url = server_url;
    }

    match args.command.unwrap_or(Command::Watch) {
        Command::Watch => {
            tracing::info!("Starting dashboard watch against {}", config.server.base_url);
            run(config).await?;
        }
        Command::Events {
            year,
            month,
            day,
            event_type,
        } => {
            let query = event_query(year, month, day, event_type);
            let outcome = list_events(config, query).await?;
            if outcome.is_failure() {
                return Err(format!("Event load failed: {:?}", outcome).into());
            }
        }
    }

    Ok(())
}
