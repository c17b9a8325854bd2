//! Dashboard Watch - event dashboard client
//!
//! Polls the dashboard backend for temperature and alert status, keeps the
//! event table current, and presents new emergencies with a modal and sound.

pub mod config;
pub mod dedup;
pub mod display;
pub mod error;
pub mod events;
pub mod io;
pub mod notifier;
pub mod poller;
pub mod sound;
pub mod state;
pub mod status;

pub use config::{load_config, Config};
pub use error::{Result, WatchError};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::display::{ConsoleDisplay, Display};
use crate::events::{EventFeedLoader, EventQuery, LoadOutcome};
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::{EmergencyNotifier, Notifier};
use crate::poller::StatusPoller;

fn build_http(config: &Config) -> Result<Arc<dyn HttpClient>> {
    Ok(Arc::new(ReqwestHttpClient::with_timeout(
        config.server.request_timeout(),
    )?))
}

fn build_display(config: &Config) -> Arc<ConsoleDisplay> {
    let state = state::new_state_handle(config.display.notice_history_size);
    Arc::new(ConsoleDisplay::new(state, config.display.echo))
}

/// Run the dashboard client: load the event table, then poll status until
/// Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let http = build_http(&config)?;
    let console = build_display(&config);
    let display: Arc<dyn Display> = console.clone();
    let cancel = CancellationToken::new();

    let sound = sound::from_config(config.alerts.sound.as_ref());
    let notifier: Arc<dyn Notifier> = Arc::new(EmergencyNotifier::new(
        console,
        sound,
        config.alerts.dismiss_after(),
    ));

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Initial event table load, retried in the background while unreachable
    let loader = EventFeedLoader::new(
        config.server.base_url.clone(),
        Arc::clone(&http),
        Arc::clone(&display),
    );
    let retry_delay = config.events.retry_delay();
    let cancel_for_events = cancel.clone();
    let events_task = tokio::spawn(async move {
        let outcome = loader
            .load_with_retry(&EventQuery::All, retry_delay, &cancel_for_events)
            .await;
        tracing::debug!("Initial event load finished: {:?}", outcome);
    });

    let mut poller = StatusPoller::new(
        &config.server.base_url,
        http,
        display,
        notifier,
        &config.alerts,
    );

    tracing::info!(
        "Polling {} every {:?}",
        config.server.base_url,
        config.polling.interval()
    );
    poller.run(config.polling.interval(), cancel.clone()).await;

    if let Err(e) = events_task.await {
        tracing::warn!("Event load task failed: {}", e);
    }
    tracing::info!("Dashboard watch stopped");

    Ok(())
}

/// Load one event query and render it once
pub async fn list_events(config: Config, query: EventQuery) -> Result<LoadOutcome> {
    let http = build_http(&config)?;
    let display: Arc<dyn Display> = build_display(&config);
    let loader = EventFeedLoader::new(config.server.base_url.clone(), http, display);

    tracing::debug!("Loading {}", query);
    Ok(loader.load(&query).await)
}
