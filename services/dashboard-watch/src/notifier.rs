//! Emergency presentation: modal, alert sound and timed dismissal

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::sound::AlertSound;
use crate::status::AlertInfo;

/// An emergency to present to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emergency {
    pub kind: String,
    pub description: String,
}

impl Emergency {
    pub fn from_alert(alert: &AlertInfo) -> Self {
        Self {
            kind: alert.tipo.clone().unwrap_or_default(),
            description: alert.descripcion.clone().unwrap_or_default(),
        }
    }
}

/// The modal surface an emergency is presented on
#[async_trait]
pub trait Modal: Send + Sync {
    /// Fill in the modal text fields
    async fn set_content(&self, kind: &str, description: &str);

    /// Show the modal; returns once it is visible. Showing an already
    /// visible modal does nothing.
    async fn show(&self);

    async fn is_shown(&self) -> bool;

    async fn hide(&self);
}

/// Handle to a scheduled dismissal of a presented emergency
#[derive(Debug)]
pub struct DismissHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DismissHandle {
    /// A handle with nothing scheduled behind it
    pub fn detached() -> Self {
        Self {
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Cancel the dismissal; the modal stays as it is
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Wait for the dismissal to run or be cancelled
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Trait for presenting emergencies
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, emergency: &Emergency) -> DismissHandle;
}

/// Presents an emergency on a modal with an alert sound, dismissing both
/// after a fixed window
pub struct EmergencyNotifier {
    modal: Arc<dyn Modal>,
    sound: Arc<dyn AlertSound>,
    dismiss_after: Duration,
}

impl std::fmt::Debug for EmergencyNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmergencyNotifier")
            .field("sound", &self.sound)
            .field("dismiss_after", &self.dismiss_after)
            .finish()
    }
}

impl EmergencyNotifier {
    pub fn new(modal: Arc<dyn Modal>, sound: Arc<dyn AlertSound>, dismiss_after: Duration) -> Self {
        Self {
            modal,
            sound,
            dismiss_after,
        }
    }

    fn schedule_dismissal(&self) -> DismissHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let modal = Arc::clone(&self.modal);
        let sound = Arc::clone(&self.sound);
        let window = self.dismiss_after;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(window) => {}
                _ = token.cancelled() => {
                    tracing::debug!("Emergency dismissal cancelled");
                    return;
                }
            }

            if modal.is_shown().await {
                modal.hide().await;
            }
            if let Err(e) = sound.stop().await {
                tracing::error!("Failed to stop alert sound: {}", e);
            }
            tracing::debug!("Emergency dismissed after {:?}", window);
        });

        DismissHandle {
            cancel,
            task: Some(task),
        }
    }
}

#[async_trait]
impl Notifier for EmergencyNotifier {
    async fn notify(&self, emergency: &Emergency) -> DismissHandle {
        tracing::warn!("Emergency alert detected: {}", emergency.kind);

        self.modal
            .set_content(&emergency.kind, &emergency.description)
            .await;

        // A failed first attempt gets one more try once the modal is visible.
        let retry_when_shown = match self.sound.play().await {
            Ok(()) => false,
            Err(e) => {
                tracing::error!("Failed to play alert sound: {}", e);
                true
            }
        };

        self.modal.show().await;

        if retry_when_shown {
            if let Err(e) = self.sound.play().await {
                tracing::error!("Failed to play alert sound after showing the alert: {}", e);
            }
        }

        self.schedule_dismissal()
    }
}
