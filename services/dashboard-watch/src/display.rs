//! Display surface the dashboard renders into

use async_trait::async_trait;

use crate::events::EventRow;
use crate::notifier::Modal;
use crate::state::{Label, LabelStyle, Notice, StateHandle};

/// Build the temperature label for a reading (`None` when unavailable)
pub fn temperature_label(reading: Option<&str>) -> Label {
    match reading {
        Some(value) => Label::new(
            format!("Current temperature: {} °C", value),
            LabelStyle::Normal,
        ),
        None => Label::new("Current temperature: -- °C", LabelStyle::Muted),
    }
}

/// Trait for the dashboard's visible surface
#[async_trait]
pub trait Display: Send + Sync {
    /// Update the temperature label
    async fn show_temperature(&self, reading: Option<&str>);

    /// Update the alert label and the active-alert flag
    async fn show_alert(&self, label: Label, active: bool);

    /// Replace the event table contents
    async fn show_events(&self, rows: Vec<EventRow>);

    /// Surface a transient notice
    async fn show_notice(&self, notice: Notice);
}

/// Display that keeps the rendered model in shared state and optionally
/// echoes every change to stdout
#[derive(Debug, Clone)]
pub struct ConsoleDisplay {
    state: StateHandle,
    echo: bool,
}

impl ConsoleDisplay {
    pub fn new(state: StateHandle, echo: bool) -> Self {
        Self { state, echo }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }
}

#[async_trait]
impl Display for ConsoleDisplay {
    async fn show_temperature(&self, reading: Option<&str>) {
        let label = temperature_label(reading);
        let mut state = self.state.write().await;
        if self.echo && state.temperature != label {
            println!("{}", label.text);
        }
        state.temperature = label;
    }

    async fn show_alert(&self, label: Label, active: bool) {
        let mut state = self.state.write().await;
        if self.echo && (state.alert != label || state.alert_active != active) {
            println!("{}", label.text);
        }
        state.alert = label;
        state.alert_active = active;
    }

    async fn show_events(&self, rows: Vec<EventRow>) {
        if self.echo {
            for row in &rows {
                println!(
                    "{:<19} | {:<20} | {:<16} | {} [{}]",
                    row.record.fecha,
                    row.record.ubicacion,
                    row.record.tipo,
                    row.record.descripcion,
                    row.style
                );
            }
        }
        self.state.write().await.rows = rows;
    }

    async fn show_notice(&self, notice: Notice) {
        if self.echo {
            println!("[{}] {}", notice.level, notice.message);
        }
        self.state.write().await.add_notice(notice);
    }
}

#[async_trait]
impl Modal for ConsoleDisplay {
    async fn set_content(&self, kind: &str, description: &str) {
        let mut state = self.state.write().await;
        state.modal.kind = kind.to_string();
        state.modal.description = description.to_string();
    }

    async fn show(&self) {
        let mut state = self.state.write().await;
        if state.modal.shown {
            return;
        }
        state.modal.shown = true;
        state.modal.times_shown += 1;
        if self.echo {
            println!("!!! EMERGENCY: {} !!!", state.modal.kind);
            println!("    {}", state.modal.description);
        }
    }

    async fn is_shown(&self) -> bool {
        self.state.read().await.modal.shown
    }

    async fn hide(&self) {
        let mut state = self.state.write().await;
        if state.modal.shown && self.echo {
            println!("--- emergency notice dismissed ---");
        }
        state.modal.shown = false;
    }
}
