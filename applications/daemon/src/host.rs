//! Terminal host environment
//!
//! There is no service manager or notification shade here. Lifecycle
//! signals are logged and the latest notification is kept for `status`.

use std::sync::{Arc, Mutex};
use tonearm_core::{HostEnvironment, Notification, NotificationAction};
use tracing::info;

/// What the host currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostView {
    pub running: bool,
    pub foreground: bool,
    pub notification: Option<Notification>,
}

/// Host environment that logs every lifecycle signal
#[derive(Debug, Clone, Default)]
pub struct LoggingHost {
    view: Arc<Mutex<HostView>>,
}

impl LoggingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current host state
    pub fn view(&self) -> HostView {
        self.view.lock().map(|view| view.clone()).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut HostView)) {
        if let Ok(mut view) = self.view.lock() {
            f(&mut view);
        }
    }
}

/// One-line rendering of a notification
pub fn describe(notification: &Notification) -> String {
    let buttons: Vec<&str> = notification
        .actions
        .iter()
        .map(|action| match action {
            NotificationAction::Previous => "prev",
            NotificationAction::Play => "play",
            NotificationAction::Pause => "pause",
            NotificationAction::Next => "next",
        })
        .collect();

    format!(
        "{} - {} [{}]",
        notification.artist,
        notification.title,
        buttons.join("|")
    )
}

impl HostEnvironment for LoggingHost {
    fn start_service(&mut self) {
        info!("Service started");
        self.update(|view| view.running = true);
    }

    fn enter_foreground(&mut self, notification: &Notification) {
        info!(notification = %describe(notification), "Entered foreground");
        self.update(|view| {
            view.foreground = true;
            view.notification = Some(notification.clone());
        });
    }

    fn update_notification(&mut self, notification: &Notification) {
        info!(notification = %describe(notification), "Notification updated");
        self.update(|view| view.notification = Some(notification.clone()));
    }

    fn exit_foreground(&mut self, remove_notification: bool) {
        info!(remove_notification, "Left foreground");
        self.update(|view| {
            view.foreground = false;
            if remove_notification {
                view.notification = None;
            }
        });
    }

    fn stop_service(&mut self) {
        info!("Service stopped");
        self.update(|view| view.running = false);
    }
}
