use std::time::{Duration, SystemTime};

/// How long a notification stays on screen.
pub const TOAST_SECS: u64 = 3;

/// Transient on-screen notification that auto-dismisses.
#[derive(Debug)]
pub struct Toast {
    message: Option<String>,
    shown_at: SystemTime,
    lifetime: Duration,
}

impl Toast {
    pub fn new() -> Self {
        Self::with_lifetime(Duration::from_secs(TOAST_SECS))
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            message: None,
            shown_at: SystemTime::now(),
            lifetime,
        }
    }

    pub fn show(&mut self, message: String) {
        self.message = Some(message);
        self.shown_at = SystemTime::now();
    }

    /// The message to render, if it hasn't expired yet.
    pub fn message(&self) -> Option<&str> {
        let expired = self
            .shown_at
            .elapsed()
            .map(|elapsed| elapsed >= self.lifetime)
            .unwrap_or(true);
        if expired {
            None
        } else {
            self.message.as_deref()
        }
    }

    /// Drop an expired message so the overlay stops rendering.
    pub fn on_tick(&mut self) {
        if self.message.is_some() && self.message().is_none() {
            self.message = None;
        }
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new()
    }
}
