//! # Module lifecycle tracker.
//!
//! Maintains the lifecycle state of every module the supervisor has seen.
//!
//! ## Transitions
//! ```text
//! NotStarted ──start──► Starting ──spawned──► Running ──stop──► Stopped
//!     ▲                    │                     │
//!     └──launch failed─────┘                     └──read error──► Crashed
//! ```
//!
//! ## Rules
//! - Only a fresh `start` leaves `Stopped` or `Crashed` (back through `Starting`)
//! - A clean end-of-stream is **not** a transition: the entry and its `Running`
//!   state remain until an explicit `stop` or a superseding `start`
//! - Reads are eventually consistent with respect to in-flight control calls

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Lifecycle state of one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Never started, or the last launch attempt failed.
    NotStarted,
    /// A `start` call is resolving and spawning the executable.
    Starting,
    /// The child is registered and its output worker is attached.
    Running,
    /// Explicitly stopped; the registry entry is gone.
    Stopped,
    /// The output stream failed; the stale entry remains until stop/restart.
    Crashed,
}

/// Thread-safe tracker of module lifecycle states.
pub(crate) struct StateTracker {
    state: RwLock<HashMap<String, ModuleState>>,
}

impl StateTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Records `state` for `module`.
    pub async fn set(&self, module: &str, state: ModuleState) {
        let mut map = self.state.write().await;
        map.insert(module.to_string(), state);
    }

    /// Returns the module's current state; unknown modules are `NotStarted`.
    pub async fn get(&self, module: &str) -> ModuleState {
        self.state
            .read()
            .await
            .get(module)
            .copied()
            .unwrap_or(ModuleState::NotStarted)
    }
}
