//! # Notifications
//!
//! Desktop-style notifications rendered as log lines on the `notify` target,
//! so they reach both the console and the session log.

use chrono::Local;

use crate::domain::traits::Notifier;

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, title: &str, body: &str) {
        let timestamp = Local::now().format("%H:%M:%S");
        tracing::info!(target: "notify", "[{}] {}: {}", timestamp, title, body);
    }
}
