//! Status poller: periodic status fetch and dispatch

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::AlertsConfig;
use crate::dedup::AlertDeduplicator;
use crate::display::Display;
use crate::io::HttpClient;
use crate::notifier::{DismissHandle, Notifier};
use crate::state::Notice;
use crate::status::{AlertInfo, StatusResponse};

pub const STATUS_PATH: &str = "/estado_dashboard";

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error with the server. Retrying...";

/// Result of one status request
#[derive(Debug, Clone, PartialEq)]
pub enum StatusFetch {
    Success(StatusResponse),
    /// The request did not complete or the payload could not be read
    Failure(String),
}

/// Polls the status endpoint and drives the alert display
pub struct StatusPoller {
    status_url: String,
    http: Arc<dyn HttpClient>,
    display: Arc<dyn Display>,
    notifier: Arc<dyn Notifier>,
    dedup: AlertDeduplicator,
    connection_error: bool,
    preempt_dismissal: bool,
    dismissal: Option<DismissHandle>,
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("status_url", &self.status_url)
            .field("dedup", &self.dedup)
            .field("connection_error", &self.connection_error)
            .finish()
    }
}

impl StatusPoller {
    pub fn new(
        base_url: &str,
        http: Arc<dyn HttpClient>,
        display: Arc<dyn Display>,
        notifier: Arc<dyn Notifier>,
        alerts: &AlertsConfig,
    ) -> Self {
        let status_url = format!("{}{}", base_url.trim_end_matches('/'), STATUS_PATH);
        tracing::debug!("Created StatusPoller for {}", status_url);

        Self {
            status_url,
            http,
            display,
            notifier,
            dedup: AlertDeduplicator::new(alerts.normal_message.clone()),
            connection_error: false,
            preempt_dismissal: alerts.preempt_dismissal,
            dismissal: None,
        }
    }

    pub fn connection_error(&self) -> bool {
        self.connection_error
    }

    pub fn dedup(&self) -> &AlertDeduplicator {
        &self.dedup
    }

    /// Request the current status
    pub async fn fetch(&self) -> StatusFetch {
        match self.http.get(&self.status_url).await {
            Ok(response) if !response.is_success() => {
                StatusFetch::Failure(format!("status endpoint returned {}", response.status))
            }
            Ok(response) => match serde_json::from_str::<StatusResponse>(&response.body) {
                Ok(status) => StatusFetch::Success(status),
                Err(e) => StatusFetch::Failure(format!("invalid status payload: {}", e)),
            },
            Err(e) => StatusFetch::Failure(e.to_string()),
        }
    }

    /// Apply one status result to the display
    pub async fn handle(&mut self, fetch: StatusFetch) {
        let status = match fetch {
            StatusFetch::Failure(reason) => {
                tracing::error!("Status update failed: {}", reason);
                if !self.connection_error {
                    self.connection_error = true;
                    self.display
                        .show_notice(Notice::danger(CONNECTION_ERROR_MESSAGE))
                        .await;
                }
                return;
            }
            StatusFetch::Success(status) => status,
        };

        self.connection_error = false;
        tracing::debug!("Status updated: {:?}", status);

        if !status.is_ok() {
            let message = status.failure_message();
            tracing::error!("Dashboard status error: {}", message);
            self.display
                .show_notice(Notice::warning(format!("Dashboard status error: {}", message)))
                .await;
            return;
        }

        self.display
            .show_temperature(status.temperature().as_deref())
            .await;

        if let Some(alert) = &status.alerta {
            self.check_alert(alert).await;
        }
    }

    async fn check_alert(&mut self, alert: &AlertInfo) {
        let outcome = self.dedup.evaluate(alert);
        self.display
            .show_alert(outcome.label().clone(), outcome.is_active())
            .await;

        let Some(emergency) = outcome.emergency() else {
            return;
        };

        if self.preempt_dismissal {
            if let Some(previous) = self.dismissal.take() {
                previous.cancel();
            }
        }
        self.dismissal = Some(self.notifier.notify(emergency).await);
    }

    pub async fn poll_once(&mut self) {
        let fetch = self.fetch().await;
        self.handle(fetch).await;
    }

    /// Poll until `cancel` fires, waiting `interval` after each poll. The
    /// first poll runs immediately.
    pub async fn run(&mut self, interval: Duration, cancel: CancellationToken) {
        loop {
            self.poll_once().await;

            // Wait for the next poll or cancellation
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = cancel.cancelled() => {
                    tracing::debug!("Status polling cancelled");
                    break;
                }
            }
        }
    }
}
