use super::{StatusSink, StatusTarget};

/// A [`StatusSink`] that renders status text as log messages.
///
/// Every frame is one message, so this is mostly for debugging
/// and for hosts without a real status area.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    level: log::Level,
}

impl Default for LogSink {
    fn default() -> Self {
        Self {
            level: log::Level::Debug,
        }
    }
}

impl LogSink {
    /// Log status text at `level`
    pub fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl StatusSink for LogSink {
    fn render_status(&self, target: &StatusTarget, text: &str) -> crate::Result<()> {
        log::log!(self.level, "[{target}] {text}");
        Ok(())
    }
}
