//! Alert deduplication
//!
//! Decides, for each alert payload, what the alert label shows and whether
//! the emergency is new enough to be presented again.
//!
//! | Payload | Label | Active flag | Notify | Last notified message |
//! |---------|-------|-------------|--------|-----------------------|
//! | `error` set | error | cleared | no | unchanged |
//! | `hay_alerta` | active | set | if message differs | set to message |
//! | normal | normal | cleared | no | cleared on the canonical normal message |

use crate::notifier::Emergency;
use crate::state::{Label, LabelStyle};
use crate::status::AlertInfo;

/// What an alert payload means for the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    /// The backend could not determine the alert state
    Error { label: Label },
    /// An emergency is active; `notify` is set when it has not been presented yet
    Active {
        label: Label,
        notify: Option<Emergency>,
    },
    /// Normal operation
    Normal { label: Label },
}

impl AlertOutcome {
    pub fn label(&self) -> &Label {
        match self {
            AlertOutcome::Error { label }
            | AlertOutcome::Active { label, .. }
            | AlertOutcome::Normal { label } => label,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AlertOutcome::Active { .. })
    }

    pub fn emergency(&self) -> Option<&Emergency> {
        match self {
            AlertOutcome::Active { notify, .. } => notify.as_ref(),
            _ => None,
        }
    }
}

/// Tracks the last notified alert message
#[derive(Debug, Clone)]
pub struct AlertDeduplicator {
    normal_message: String,
    last_notified: Option<String>,
    alert_active: bool,
}

impl AlertDeduplicator {
    pub fn new(normal_message: impl Into<String>) -> Self {
        Self {
            normal_message: normal_message.into(),
            last_notified: None,
            alert_active: false,
        }
    }

    pub fn last_notified(&self) -> Option<&str> {
        self.last_notified.as_deref()
    }

    pub fn alert_active(&self) -> bool {
        self.alert_active
    }

    /// Evaluate one alert payload, updating the dedup state
    pub fn evaluate(&mut self, alert: &AlertInfo) -> AlertOutcome {
        if let Some(error) = alert.error_text() {
            tracing::debug!("Alert payload reports an error: {}", error);
            self.alert_active = false;
            return AlertOutcome::Error {
                label: Label::new(format!("Error: {}", error), LabelStyle::Error),
            };
        }

        if alert.hay_alerta {
            self.alert_active = true;
            let label = Label::new(format!("Alert: {}", alert.mensaje), LabelStyle::Active);

            // An empty last message counts as nothing notified yet.
            let is_new = self
                .last_notified
                .as_deref()
                .is_none_or(|last| last.is_empty() || last != alert.mensaje);
            let notify = if is_new {
                tracing::info!("New emergency: {}", alert.mensaje);
                self.last_notified = Some(alert.mensaje.clone());
                Some(Emergency::from_alert(alert))
            } else {
                tracing::debug!("Emergency already notified: {}", alert.mensaje);
                None
            };
            return AlertOutcome::Active { label, notify };
        }

        if self.last_notified.is_some() && alert.mensaje == self.normal_message {
            tracing::info!("Back to normal operation, re-arming alerts");
            self.last_notified = None;
        }
        self.alert_active = false;
        AlertOutcome::Normal {
            label: Label::new(format!("Alert: {}", alert.mensaje), LabelStyle::Normal),
        }
    }
}
