//! Host glue: the editor-process side of the boundary.
//!
//! Owns the persistent store and the history database, forwards edit notices
//! to the panel, delivers the initial state load after a short delay (so the
//! panel is attached before the message lands), and throttles host-initiated
//! state requests.

use std::time::{Duration, SystemTime};

use crate::badge::is_noise;
use crate::history::{today, HistoryDb};
use crate::protocol::{HostMessage, PanelMessage};
use crate::state::TrackerState;
use crate::store::StateStore;

/// Ticks to wait before delivering the initial `setState`.
const LOAD_DELAY_TICKS: u8 = 1;

pub struct HostGlue<S: StateStore> {
    store: S,
    history: Option<HistoryDb>,
    /// Last snapshot written to the store; history records the delta
    /// between consecutive snapshots.
    last_persisted: TrackerState,
    pending_load: u8,
    loaded: bool,
    request_interval: Duration,
    last_request: SystemTime,
}

impl<S: StateStore> HostGlue<S> {
    pub fn new(store: S, history: Option<HistoryDb>, request_state_secs: u64) -> Self {
        Self {
            store,
            history,
            last_persisted: TrackerState::new(),
            pending_load: LOAD_DELAY_TICKS,
            loaded: false,
            request_interval: Duration::from_secs(request_state_secs),
            // Start the throttle clock now: the first request comes one full
            // interval after startup, well past the initial load.
            last_request: SystemTime::now(),
        }
    }

    /// An edit notice arrived from the editor stream.
    pub fn on_edit(&mut self, language: Option<String>) -> Vec<HostMessage> {
        let mut out = vec![HostMessage::UserActive { language }];
        let due = self
            .last_request
            .elapsed()
            .map(|e| e >= self.request_interval)
            .unwrap_or(true);
        if due {
            self.last_request = SystemTime::now();
            out.push(HostMessage::RequestState {});
        }
        out
    }

    /// Host-side clock. Emits the delayed initial load exactly once.
    pub fn on_tick(&mut self) -> Vec<HostMessage> {
        if self.loaded {
            return Vec::new();
        }
        if self.pending_load > 0 {
            self.pending_load -= 1;
        }
        if self.pending_load > 0 {
            return Vec::new();
        }
        self.loaded = true;
        let state = self.store.load();
        self.last_persisted = state.clone();
        vec![HostMessage::set_state(&state)]
    }

    /// Apply a panel message. Saving is fire-and-forget: a failed write
    /// costs at most one save interval's worth of seconds.
    pub fn on_panel_message(&mut self, msg: PanelMessage) {
        match msg {
            PanelMessage::SaveState {
                total_seconds,
                language_stats,
            } => {
                let state = TrackerState {
                    total_seconds,
                    language_stats,
                };
                let _ = self.store.save(&state);
                if self.loaded {
                    self.record_history(&state);
                }
                self.last_persisted = state;
            }
        }
    }

    fn record_history(&self, state: &TrackerState) {
        let Some(history) = &self.history else {
            return;
        };
        let day = today();

        let total_delta = state
            .total_seconds
            .saturating_sub(self.last_persisted.total_seconds);
        if total_delta > 0 {
            let _ = history.record_day_seconds(&day, total_delta);
        }

        for (language, seconds) in &state.language_stats {
            if is_noise(language) {
                continue;
            }
            let before = self
                .last_persisted
                .language_stats
                .get(language)
                .copied()
                .unwrap_or(0);
            let delta = seconds.saturating_sub(before);
            if delta > 0 {
                let _ = history.record_language_seconds(&day, language, delta);
            }
        }
    }

    pub fn history(&self) -> Option<&HistoryDb> {
        self.history.as_ref()
    }
}
