//! Activity timer state machine.
//!
//! Wall-clock-free: the caller delivers ticks (one per second) and activity
//! signals; the machine decides what accrues. No internal threads.
//!
//! ```text
//! Stopped -> Running   on any activity signal
//! Running -> Stopped   after the inactivity window elapses with no signal
//! ```

use std::time::SystemTime;

use crate::badge::is_noise;
use crate::level::level_for;
use crate::state::TrackerState;

/// Seconds without an activity signal before the timer pauses.
pub const INACTIVITY_SECS: u64 = 60;
/// Persist cadence while running, in ticks.
pub const SAVE_EVERY_TICKS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerStatus {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistReason {
    /// The periodic save cadence came up.
    Cadence,
    /// The inactivity window elapsed and the timer paused.
    InactivityStop,
}

/// What a tick produced, beyond mutating the tracker state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The accumulated time crossed into a higher tier.
    LevelUp { level: usize },
    /// The state should be written back to the host.
    Persist { reason: PersistReason },
}

#[derive(Debug)]
pub struct ActivityTimer {
    status: TimerStatus,
    ticks_since_activity: u64,
    inactivity_ticks: u64,
    save_every_ticks: u64,
    active_language: Option<String>,
    current_level: usize,
    last_activity: Option<SystemTime>,
}

impl ActivityTimer {
    pub fn new(inactivity_ticks: u64, save_every_ticks: u64) -> Self {
        Self {
            status: TimerStatus::Stopped,
            ticks_since_activity: 0,
            inactivity_ticks,
            save_every_ticks,
            active_language: None,
            current_level: 0,
            last_activity: None,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn active_language(&self) -> Option<&str> {
        self.active_language.as_deref()
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn last_activity(&self) -> Option<SystemTime> {
        self.last_activity
    }

    /// Re-anchor the level index after the panel adopts externally loaded
    /// state, so the next tick doesn't announce tiers already reached.
    pub fn sync_level(&mut self, total_seconds: u64) {
        self.current_level = level_for(total_seconds);
    }

    /// An edit happened. Starts the timer if stopped, resets the inactivity
    /// window either way, and switches the attributed language when the
    /// signal names one.
    pub fn on_activity(&mut self, language: Option<String>) {
        self.status = TimerStatus::Running;
        self.ticks_since_activity = 0;
        self.active_language = language;
        self.last_activity = Some(SystemTime::now());
    }

    /// One second elapsed. Mutates `state` and reports what happened.
    /// Ticks delivered while stopped accrue nothing.
    pub fn on_tick(&mut self, state: &mut TrackerState) -> Vec<TimerEvent> {
        if self.status == TimerStatus::Stopped {
            return Vec::new();
        }

        self.ticks_since_activity += 1;
        if self.ticks_since_activity > self.inactivity_ticks {
            self.status = TimerStatus::Stopped;
            return vec![TimerEvent::Persist {
                reason: PersistReason::InactivityStop,
            }];
        }

        state.total_seconds += 1;
        if let Some(lang) = &self.active_language {
            if !is_noise(lang) {
                state.record_language_second(lang);
            }
        }

        let mut events = Vec::new();

        let level = level_for(state.total_seconds);
        if level > self.current_level {
            events.push(TimerEvent::LevelUp { level });
        }
        self.current_level = level;

        if state.total_seconds % self.save_every_ticks == 0 {
            events.push(TimerEvent::Persist {
                reason: PersistReason::Cadence,
            });
        }

        events
    }
}

impl Default for ActivityTimer {
    fn default() -> Self {
        Self::new(INACTIVITY_SECS, SAVE_EVERY_TICKS)
    }
}
