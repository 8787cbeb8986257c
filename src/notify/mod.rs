// ABOUTME: Notification sinks for deployment progress and outcomes.
// ABOUTME: Workflows report through the Notifier trait; console and Slack implement it.

mod console;
mod slack;

pub use console::ConsoleNotifier;
pub use slack::SlackNotifier;

use async_trait::async_trait;

/// Severity of a leveled notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Plain,
    Success,
    Failure,
}

/// Where workflows send progress messages and final outcomes.
///
/// Delivery is best effort: a sink that cannot deliver logs the problem and
/// returns, it never fails the workflow.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A plain progress message.
    async fn log(&self, message: &str) {
        self.notify(NotifyKind::Plain, message).await;
    }

    /// A message of the given kind.
    async fn notify(&self, kind: NotifyKind, message: &str);
}

/// Fans every message out to several sinks, in order.
#[derive(Default)]
pub struct Notifiers {
    sinks: Vec<Box<dyn Notifier>>,
}

impl Notifiers {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, sink: impl Notifier + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl Notifier for Notifiers {
    async fn notify(&self, kind: NotifyKind, message: &str) {
        for sink in &self.sinks {
            sink.notify(kind, message).await;
        }
    }
}
