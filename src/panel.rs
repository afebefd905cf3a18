//! The panel: the embedded side of the host/panel boundary.
//!
//! The host drives the panel through its lifecycle hooks (`on_create`,
//! `on_message`, `on_tick`, `on_dispose`); the panel never schedules its own
//! work. Outbound traffic is the returned `PanelMessage` batch, which the
//! caller relays to the host glue.

use crate::confetti::Confetti;
use crate::level::LEVELS;
use crate::protocol::{HostMessage, PanelMessage};
use crate::state::TrackerState;
use crate::store::{MemoryStateStore, StateStore};
use crate::timer::{ActivityTimer, TimerEvent};
use crate::toast::Toast;

pub struct Panel {
    state: TrackerState,
    timer: ActivityTimer,
    toast: Toast,
    confetti: Confetti,
    /// Fast local cache, written on every save. A recreated panel sharing
    /// this cache restores itself without waiting for the host's `setState`.
    cache: MemoryStateStore,
    viewport: (u16, u16),
}

impl Panel {
    pub fn new(timer: ActivityTimer, cache: MemoryStateStore) -> Self {
        Self {
            state: TrackerState::new(),
            timer,
            toast: Toast::new(),
            confetti: Confetti::new(),
            cache,
            viewport: (40, 30),
        }
    }

    // ── Lifecycle hooks ─────────────────────────────────────────────

    /// Host created the panel. Restores from the local cache when it holds
    /// a snapshot; the host's `setState` will follow and win regardless.
    pub fn on_create(&mut self) {
        if !self.cache.is_empty() {
            self.adopt(self.cache.load());
        }
    }

    pub fn on_message(&mut self, msg: HostMessage) -> Vec<PanelMessage> {
        match msg {
            HostMessage::UserActive { language } => {
                self.timer.on_activity(language);
                Vec::new()
            }
            HostMessage::SetState {
                total_seconds,
                language_stats,
            } => {
                self.adopt(TrackerState {
                    total_seconds,
                    language_stats,
                });
                self.save_local();
                Vec::new()
            }
            HostMessage::RequestState {} => vec![self.save()],
        }
    }

    /// One second elapsed on the event loop.
    pub fn on_tick(&mut self) -> Vec<PanelMessage> {
        let mut out = Vec::new();
        for event in self.timer.on_tick(&mut self.state) {
            match event {
                TimerEvent::LevelUp { level } => {
                    self.toast
                        .show(format!("Unlocked: {}!", LEVELS[level].name));
                    let (w, h) = self.viewport;
                    self.confetti.start(w, h);
                }
                TimerEvent::Persist { .. } => out.push(self.save()),
            }
        }
        self.toast.on_tick();
        self.confetti.update();
        out
    }

    /// Host is tearing the panel down; flush the counters one last time.
    pub fn on_dispose(&mut self) -> Vec<PanelMessage> {
        vec![self.save()]
    }

    /// Advance only the visual effects, for redraws between ticks.
    pub fn animate(&mut self) {
        self.toast.on_tick();
        self.confetti.update();
    }

    /// Whether the renderer needs frames faster than the 1 Hz tick.
    pub fn needs_animation_frames(&self) -> bool {
        self.confetti.is_active
    }

    // ── Queries for the renderer ────────────────────────────────────

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn timer(&self) -> &ActivityTimer {
        &self.timer
    }

    pub fn toast_message(&self) -> Option<&str> {
        self.toast.message()
    }

    pub fn confetti(&self) -> &Confetti {
        &self.confetti
    }

    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
    }

    // ── Internals ───────────────────────────────────────────────────

    fn adopt(&mut self, state: TrackerState) {
        self.timer.sync_level(state.total_seconds);
        self.state = state;
    }

    fn save_local(&self) {
        // The cache is infallible; the store trait isn't.
        let _ = self.cache.save(&self.state);
    }

    fn save(&self) -> PanelMessage {
        self.save_local();
        PanelMessage::save_state(&self.state)
    }
}
