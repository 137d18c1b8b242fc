use tracing::info;

/// One-way status display. Fire and forget.
pub trait StatusSink {
    fn write(&mut self, message: &str);
}

/// Forwards status messages to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn write(&mut self, message: &str) {
        info!(target: "status", "{message}");
    }
}

/// Collects messages in order; used by tests and headless runs.
impl StatusSink for Vec<String> {
    fn write(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}
