//! Operator-facing notification surface and navigation.
//!
//! The orchestrator only describes what to show; presentation belongs to the
//! `Notifier` implementation.
use std::time::Duration;

/// Auto-dismiss timer for ordinary toasts.
pub const DEFAULT_TOAST_TIMER: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Info,
    Warning,
    Error,
    Question,
}

/// Blocking dialog. Without a cancel label it is a plain alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub body: String,
    pub icon: Icon,
    pub confirm_label: String,
    pub cancel_label: Option<String>,
}

impl Modal {
    pub fn alert(title: &str, body: impl Into<String>, icon: Icon) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            icon,
            confirm_label: "OK".to_string(),
            cancel_label: None,
        }
    }

    pub fn confirm(
        title: &str,
        body: impl Into<String>,
        icon: Icon,
        confirm_label: &str,
        cancel_label: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            icon,
            confirm_label: confirm_label.to_string(),
            cancel_label: Some(cancel_label.to_string()),
        }
    }
}

/// Which way a modal was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalChoice {
    Confirmed,
    Cancelled,
    /// Closed without pressing either button.
    Dismissed,
}

impl ModalChoice {
    pub fn is_confirmed(self) -> bool {
        matches!(self, ModalChoice::Confirmed)
    }
}

/// Non-blocking notice that disappears after `timer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub text: String,
    pub icon: Icon,
    pub timer: Duration,
}

impl Toast {
    pub fn new(title: &str, text: impl Into<String>, icon: Icon) -> Self {
        Self {
            title: title.to_string(),
            text: text.into(),
            icon,
            timer: DEFAULT_TOAST_TIMER,
        }
    }

    pub fn with_timer(mut self, timer: Duration) -> Self {
        self.timer = timer;
        self
    }
}

pub trait Notifier {
    fn modal(&mut self, modal: Modal) -> ModalChoice;
    fn toast(&mut self, toast: Toast);
    /// Show a persistent "working" indicator until `stop_loading`.
    fn start_loading(&mut self, title: &str, text: &str);
    fn stop_loading(&mut self);
}

/// Moves the operator to another stage of the tool.
pub trait Navigator {
    fn navigate(&mut self, target: &str);
}
