//! Configuration types for the dashboard client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Message the backend reports when no emergency is active
pub const NORMAL_OPERATION_MESSAGE: &str = "Sistema operando normalmente";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Status polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_polling_interval")]
    pub interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_polling_interval(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Event feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            retry_delay_seconds: default_retry_delay(),
        }
    }
}

impl EventsConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }
}

/// Emergency alert settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_normal_message")]
    pub normal_message: String,
    #[serde(default = "default_dismiss_after")]
    pub dismiss_after_seconds: u64,
    /// Cancel a still-running dismissal window when a new alert is presented
    #[serde(default)]
    pub preempt_dismissal: bool,
    /// External player for the alert sound; the terminal bell is used when unset
    #[serde(default)]
    pub sound: Option<SoundConfig>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            normal_message: default_normal_message(),
            dismiss_after_seconds: default_dismiss_after(),
            preempt_dismissal: false,
            sound: None,
        }
    }
}

impl AlertsConfig {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_secs(self.dismiss_after_seconds)
    }
}

/// External sound player command, e.g. `aplay /usr/share/sounds/alert.wav`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Console display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub echo: bool,
    #[serde(default = "default_notice_history_size")]
    pub notice_history_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            echo: true,
            notice_history_size: default_notice_history_size(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_polling_interval() -> u64 {
    5
}

fn default_retry_delay() -> u64 {
    10
}

fn default_normal_message() -> String {
    NORMAL_OPERATION_MESSAGE.to_string()
}

fn default_dismiss_after() -> u64 {
    9
}

fn default_true() -> bool {
    true
}

fn default_notice_history_size() -> usize {
    50
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    if config.polling.interval_seconds == 0 {
        return Err(crate::WatchError::Config(
            "polling.interval_seconds must be greater than zero".to_string(),
        ));
    }
    Ok(config)
}
