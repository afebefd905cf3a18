//! Key-value persistence for the tracker state.
//!
//! The store holds exactly two values, written whole: the total-seconds
//! counter and the language map. A missing or unreadable store loads as the
//! zeroed default; that is the normal first-run path, not an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::app_dirs::AppDirs;
use crate::state::TrackerState;

pub trait StateStore {
    fn load(&self) -> TrackerState;
    fn save(&self, state: &TrackerState) -> std::io::Result<()>;
}

/// JSON file store under the application state directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::state_path().unwrap_or_else(|| PathBuf::from("levelup_state.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> TrackerState {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(state) = serde_json::from_slice::<TrackerState>(&bytes) {
                return state;
            }
        }
        TrackerState::default()
    }

    fn save(&self, state: &TrackerState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(state).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory store. Serves as the panel's fast local cache (so a recreated
/// panel comes back without waiting for the host) and as the test double.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<Option<TrackerState>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("store lock poisoned").is_none()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> TrackerState {
        self.inner
            .lock()
            .expect("store lock poisoned")
            .clone()
            .unwrap_or_default()
    }

    fn save(&self, state: &TrackerState) -> std::io::Result<()> {
        *self.inner.lock().expect("store lock poisoned") = Some(state.clone());
        Ok(())
    }
}
