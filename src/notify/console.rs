// ABOUTME: Console notification sink.
// ABOUTME: Routes notifications to the mode-aware CLI Output.

use super::{Notifier, NotifyKind};
use crate::output::Output;
use async_trait::async_trait;

/// Prints notifications to the terminal.
#[derive(Debug)]
pub struct ConsoleNotifier {
    output: Output,
}

impl ConsoleNotifier {
    pub fn new(mut output: Output) -> Self {
        output.start_timer();
        Self { output }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Plain => self.output.progress(message),
            NotifyKind::Success => self.output.success(message),
            NotifyKind::Failure => self.output.error(message),
        }
    }
}
