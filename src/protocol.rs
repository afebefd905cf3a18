//! Messages exchanged between the host glue and the panel.
//!
//! The protocol is JSON on the wire (editor plugins may speak it directly
//! over the activity socket), tagged by a `command` field.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::TrackerState;

/// Host-to-panel commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    /// An edit occurred. Resets the inactivity window; may switch the
    /// attributed language.
    #[serde(rename_all = "camelCase")]
    UserActive {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    /// Initial or refreshed load from the persistent store.
    #[serde(rename_all = "camelCase")]
    SetState {
        total_seconds: u64,
        #[serde(default)]
        language_stats: HashMap<String, u64>,
    },
    /// Ask the panel to report its counters for saving.
    RequestState {},
}

/// Panel-to-host commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    /// Persist these counters. Fire-and-forget.
    #[serde(rename_all = "camelCase")]
    SaveState {
        total_seconds: u64,
        language_stats: HashMap<String, u64>,
    },
}

impl HostMessage {
    pub fn set_state(state: &TrackerState) -> Self {
        HostMessage::SetState {
            total_seconds: state.total_seconds,
            language_stats: state.language_stats.clone(),
        }
    }
}

impl PanelMessage {
    pub fn save_state(state: &TrackerState) -> Self {
        PanelMessage::SaveState {
            total_seconds: state.total_seconds,
            language_stats: state.language_stats.clone(),
        }
    }
}
