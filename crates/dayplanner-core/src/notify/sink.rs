use tokio::sync::mpsc;

use super::Notification;
use crate::error::SinkError;

/// Desktop notification delivery.
///
/// Delivery is fire-and-forget: the trigger engine logs and swallows any
/// error, and never retries.
pub trait NotificationSink: Send + Sync {
    fn send(&self, title: &str, body: &str) -> Result<(), SinkError>;
}

/// Forwards notifications into a channel, e.g. towards a UI thread that owns
/// the platform notification API.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn send(&self, title: &str, body: &str) -> Result<(), SinkError> {
        self.tx
            .send(Notification::message(title, body))
            .map_err(|_| SinkError("notification receiver dropped".to_string()))
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, title: &str, body: &str) -> Result<(), SinkError> {
        tracing::info!(%title, %body, "notification");
        Ok(())
    }
}
