//! # Module registry: name → live process handle.
//!
//! The registry owns the only shared mutable state in the runtime: one
//! mutex-guarded map from module name to [`Handle`]. Every control operation
//! (insert, replace, remove, lookup) goes through this lock; the per-module
//! workers never touch it on their read path.
//!
//! ## Rules
//! - At most one handle per module name at any instant
//! - `insert` reports a displaced handle instead of silently dropping it, so
//!   a lost start/start race still terminates the loser's child
//! - Termination is graceful-first: cancel the worker, request exit, and hand
//!   the child to a detached reaper that force-kills after the grace window

use std::collections::HashMap;
use std::time::Duration;

use tokio::process::Child;
use tokio::sync::RwLock;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to a running module: the child process and its worker's token.
pub(crate) struct Handle {
    /// Module name, kept for diagnostics.
    pub module: String,
    /// The owned child process (output streams already taken).
    pub child: Child,
    /// OS process id captured at spawn time.
    pub pid: Option<u32>,
    /// Cancellation token observed by the module's output workers.
    pub cancel: CancellationToken,
}

impl Handle {
    /// Tears the module down: stops the workers, asks the child to exit, and
    /// detaches a reaper that waits up to `grace` before killing it.
    ///
    /// Returns immediately; never waits on worker or child progress.
    pub fn terminate(self, grace: Duration) {
        self.cancel.cancel();

        let module = self.module;
        let mut child = self.child;

        #[cfg(unix)]
        match self.pid {
            Some(pid) => {
                use nix::sys::signal::{kill, Signal};
                use nix::unistd::Pid;
                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
            }
            // Already reaped or never observed; fall back to a hard kill
            // request so the reaper below has something to wait on.
            None => {
                let _ = child.start_kill();
            }
        }
        #[cfg(not(unix))]
        {
            let _ = child.start_kill();
        }

        tokio::spawn(async move {
            match time::timeout(grace, child.wait()).await {
                Ok(status) => {
                    debug!(module, ?status, "child exited");
                }
                Err(_) => {
                    warn!(module, ?grace, "child did not exit within grace, killing");
                    let _ = child.kill().await;
                }
            }
        });
    }
}

/// Mutex-guarded map of active modules.
pub(crate) struct Registry {
    modules: RwLock<HashMap<String, Handle>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// Installs a handle for `module`, returning a displaced handle if two
    /// starts raced for the same key (the caller terminates it).
    pub async fn insert(&self, module: String, handle: Handle) -> Option<Handle> {
        let mut modules = self.modules.write().await;
        modules.insert(module, handle)
    }

    /// Removes and returns the handle for `module`, if one is registered.
    pub async fn remove(&self, module: &str) -> Option<Handle> {
        let mut modules = self.modules.write().await;
        modules.remove(module)
    }

    /// Returns true if `module` has a registered handle.
    pub async fn contains(&self, module: &str) -> bool {
        self.modules.read().await.contains_key(module)
    }

    /// Returns the registered pid for `module`, if any.
    pub async fn pid(&self, module: &str) -> Option<u32> {
        self.modules.read().await.get(module).and_then(|h| h.pid)
    }

    /// Returns the sorted list of registered module names.
    pub async fn names(&self) -> Vec<String> {
        let modules = self.modules.read().await;
        let mut names: Vec<String> = modules.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
