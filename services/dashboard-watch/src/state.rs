//! Shared state for everything currently rendered on the dashboard

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::events::EventRow;

/// Visual style of a status label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Normal operation, or a live temperature reading
    Normal,
    /// An emergency is active
    Active,
    /// The backend reported an error
    Error,
    /// No data available
    Muted,
}

/// A text label together with its style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub style: LabelStyle,
}

impl Label {
    pub fn new(text: impl Into<String>, style: LabelStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Danger,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Danger => write!(f, "danger"),
        }
    }
}

/// A transient notification shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Danger,
            message: message.into(),
        }
    }
}

/// Contents and visibility of the emergency modal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub shown: bool,
    pub kind: String,
    pub description: String,
    pub times_shown: u32,
}

/// Everything the dashboard currently displays
#[derive(Debug)]
pub struct DisplayState {
    pub temperature: Label,
    pub alert: Label,
    pub alert_active: bool,
    pub rows: Vec<EventRow>,
    pub notices: VecDeque<Notice>,
    pub notice_max_size: usize,
    pub modal: ModalState,
}

impl DisplayState {
    pub fn new(notice_max_size: usize) -> Self {
        Self {
            temperature: crate::display::temperature_label(None),
            alert: Label::new("Alert: --", LabelStyle::Muted),
            alert_active: false,
            rows: Vec::new(),
            notices: VecDeque::with_capacity(notice_max_size),
            notice_max_size,
            modal: ModalState::default(),
        }
    }

    /// Add a notice, dropping the oldest once the history is full
    pub fn add_notice(&mut self, notice: Notice) {
        if self.notice_max_size == 0 {
            return;
        }
        if self.notices.len() >= self.notice_max_size {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// Count notices with the given message
    pub fn notice_count(&self, message: &str) -> usize {
        self.notices.iter().filter(|n| n.message == message).count()
    }
}

/// Thread-safe display state handle
pub type StateHandle = Arc<RwLock<DisplayState>>;

pub fn new_state_handle(notice_max_size: usize) -> StateHandle {
    Arc::new(RwLock::new(DisplayState::new(notice_max_size)))
}
