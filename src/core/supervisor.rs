//! # Supervisor: launches module children and routes their output.
//!
//! The [`Supervisor`] owns the module registry and the lifecycle state
//! tracker. It spawns one child process and one output worker per module,
//! enforces replace-on-restart, and performs bulk teardown.
//!
//! ## Key responsibilities
//! - resolve and spawn executables inside the configured binary directory
//! - enforce **at most one** live child and one output worker per module key
//! - convert launch failures into one synchronous `error` message (never a panic)
//! - terminate gracefully on `stop`, with a grace-bounded kill escalation
//!
//! ## High-level architecture
//! ```text
//! start("pipes", "pipe_demo", args, consumer)
//!     │
//!     ▼
//! ┌─────────────────────────────────────────────┐
//! │ Supervisor                                  │
//! │  - Registry (module name → Handle)          │
//! │  - StateTracker (module lifecycle states)   │
//! └───────┬─────────────────────────────────────┘
//!         │ launcher::launch(bin_dir/<exe>)
//!         ▼
//! ┌──────────────┐    stdout     ┌─────────────────┐
//! │ child "pipes"│ ────lines───► │ OutputStreamer  │──► consumer.handle(&msg)
//! └──────────────┘               └─────────────────┘
//! ┌──────────────┐    stdout     ┌─────────────────┐
//! │ child "shm"  │ ────lines───► │ OutputStreamer  │──► consumer.handle(&msg)
//! └──────────────┘               └─────────────────┘
//!
//! stop("pipes"):  remove entry ─► cancel worker ─► SIGTERM ─► reaper (grace, then kill)
//! stop_all():     snapshot keys ─► stop each
//! ```
//!
//! ## Example
//! ```no_run
//! use ipcvisor::{ConsumerFn, ConsumerRef, Message, Supervisor, SupervisorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sup = Supervisor::new(SupervisorConfig::default());
//!
//!     let consumer: ConsumerRef = ConsumerFn::arc("printer", |message: Message| async move {
//!         println!("[{}] {message:?}", message.as_label());
//!     });
//!
//!     if sup.start("pipes", "pipe_demo", &["Hello".into()], consumer).await {
//!         tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     }
//!     sup.stop_all().await;
//! }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SupervisorConfig;
use crate::consumers::ConsumerRef;
use crate::core::launcher;
use crate::core::registry::{Handle, Registry};
use crate::core::state::{ModuleState, StateTracker};
use crate::core::streamer::{drain_stderr, OutputStreamer};
use crate::messages::Message;

/// Launches named module children, routes their output, and tears them down.
///
/// All methods take `&self` and may be called from any task; the registry map
/// is the only shared mutable state and is guarded internally. Control
/// operations never wait on worker or consumer progress.
pub struct Supervisor {
    cfg: SupervisorConfig,
    registry: Registry,
    states: Arc<StateTracker>,
}

impl Supervisor {
    /// Creates a supervisor with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            registry: Registry::new(),
            states: Arc::new(StateTracker::new()),
        }
    }

    /// Starts (or restarts) a module.
    ///
    /// If an entry already exists for `module` it is terminated via the stop
    /// path first — entries are replaced, never merged. The executable is
    /// resolved inside [`SupervisorConfig::bin_dir`]; on a missing path or a
    /// spawn failure no worker is created, `consumer` is invoked synchronously
    /// exactly once with an `error` message, and `start` returns `false`.
    ///
    /// On success the entry is registered, a dedicated output worker begins
    /// reading, and `start` returns `true` immediately without blocking for
    /// output.
    pub async fn start(
        &self,
        module: &str,
        executable: &str,
        args: &[String],
        consumer: ConsumerRef,
    ) -> bool {
        self.stop(module).await;
        self.states.set(module, ModuleState::Starting).await;

        let spawned = match launcher::launch(module, &self.cfg.bin_dir, executable, args) {
            Ok(spawned) => spawned,
            Err(err) => {
                warn!(module, error = err.as_label(), %err, "launch failed");
                self.states.set(module, ModuleState::NotStarted).await;
                consumer.handle(&Message::launch_error(module, &err)).await;
                return false;
            }
        };

        let pid = spawned.pid;
        let cancel = CancellationToken::new();

        tokio::spawn(drain_stderr(
            module.to_string(),
            spawned.stderr,
            cancel.clone(),
        ));

        let streamer = OutputStreamer::new(
            module.to_string(),
            pid,
            Arc::clone(&consumer),
            cancel.clone(),
            self.cfg.max_line_len,
            Arc::clone(&self.states),
        );
        tokio::spawn(streamer.run(spawned.stdout));

        let handle = Handle {
            module: module.to_string(),
            child: spawned.child,
            pid,
            cancel,
        };
        if let Some(displaced) = self.registry.insert(module.to_string(), handle).await {
            // Lost a start/start race for the same key; the newer
            // registration stays and the displaced child goes down.
            displaced.terminate(self.cfg.grace);
        }
        self.states.set(module, ModuleState::Running).await;

        info!(module, ?pid, "module started");
        true
    }

    /// Stops a module.
    ///
    /// Idempotent: stopping a module with no registered entry is a no-op.
    /// Otherwise the entry is removed synchronously, the worker is cancelled,
    /// and the child is asked to exit; a detached reaper force-kills it after
    /// [`SupervisorConfig::grace`] if it does not comply.
    pub async fn stop(&self, module: &str) {
        let Some(handle) = self.registry.remove(module).await else {
            return;
        };
        debug!(module, pid = ?handle.pid, "stopping module");
        handle.terminate(self.cfg.grace);

        // A crashed module keeps its state until a fresh start.
        if self.states.get(module).await == ModuleState::Running {
            self.states.set(module, ModuleState::Stopped).await;
        }
    }

    /// Stops every currently registered module.
    ///
    /// The key set is snapshotted first, so stopping one module never
    /// perturbs the sweep; modules started concurrently after the snapshot
    /// are the caller's responsibility.
    pub async fn stop_all(&self) {
        for module in self.registry.names().await {
            self.stop(&module).await;
        }
    }

    /// Returns the sorted names of all registered modules.
    pub async fn list(&self) -> Vec<String> {
        self.registry.names().await
    }

    /// Returns true if `module` has a registered entry.
    pub async fn is_running(&self, module: &str) -> bool {
        self.registry.contains(module).await
    }

    /// Returns the OS process id registered for `module`, if any.
    pub async fn pid(&self, module: &str) -> Option<u32> {
        self.registry.pid(module).await
    }

    /// Returns the lifecycle state of `module`.
    pub async fn state(&self, module: &str) -> ModuleState {
        self.states.get(module).await
    }
}
