//! Completion alert sink.
//!
//! When a session ends, the background runner fires a short pulse and a
//! transient notification through an [`AlertSink`]. The trait keeps the
//! platform surface out of the runner: the terminal implementation rings
//! the bell and writes to stderr, and tests substitute [`MockAlert`].

use std::time::Duration;

use tracing::info;

/// Length of the completion pulse.
pub const PULSE_DURATION: Duration = Duration::from_millis(500);

// ============================================================================
// AlertSink
// ============================================================================

/// User-perceptible alert capability.
pub trait AlertSink: Send + Sync {
    /// Fires a single attention pulse of the given length.
    fn pulse(&self, duration: Duration);

    /// Shows a transient notification.
    fn notify(&self, title: &str, body: &str);
}

// ============================================================================
// TerminalAlert
// ============================================================================

/// Alert sink for a terminal session: BEL plus a stderr notice.
#[derive(Debug, Default)]
pub struct TerminalAlert;

impl TerminalAlert {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AlertSink for TerminalAlert {
    fn pulse(&self, duration: Duration) {
        // BEL is the closest a terminal gets to a vibration pulse.
        eprint!("\x07");
        info!("アラートパルスを送出しました ({}ms)", duration.as_millis());
    }

    fn notify(&self, title: &str, body: &str) {
        eprintln!("{}: {}", title, body);
        info!("通知を表示しました: {}", title);
    }
}

// ============================================================================
// MockAlert
// ============================================================================

/// Mock alert sink for testing. Records every call.
#[derive(Debug, Default)]
pub struct MockAlert {
    pulses: std::sync::Mutex<Vec<Duration>>,
    notices: std::sync::Mutex<Vec<(String, String)>>,
}

impl MockAlert {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pulses(&self) -> Vec<Duration> {
        self.pulses.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices.lock().unwrap().clone()
    }
}

impl AlertSink for MockAlert {
    fn pulse(&self, duration: Duration) {
        self.pulses.lock().unwrap().push(duration);
    }

    fn notify(&self, title: &str, body: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

// ============================================================================
// Tests
// ============================================================================
