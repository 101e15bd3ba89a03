//! # ipcvisor
//!
//! **ipcvisor** is a process supervisor and message router for line-oriented
//! IPC demonstration backends.
//!
//! It launches small native helper programs by module name, multiplexes their
//! line-delimited standard output concurrently, classifies each line into a
//! structured [`Message`], and routes it to the [`Consumer`] registered for
//! that module — with replace-on-restart semantics and clean bulk teardown.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   start("pipes", ...)   start("shm", ...)   start("sockets", ...)
//!            │                   │                    │
//!            ▼                   ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - Registry (module name → child handle, one entry per key)       │
//! │  - StateTracker (NotStarted/Starting/Running/Stopped/Crashed)     │
//! └───────┬──────────────────────┬───────────────────────┬────────────┘
//!         ▼                      ▼                       ▼
//!  ┌─────────────┐        ┌─────────────┐         ┌─────────────┐
//!  │ child proc  │        │ child proc  │         │ child proc  │
//!  │ (pipe_demo) │        │ (shm_demo)  │         │ (sock_demo) │
//!  └──────┬──────┘        └──────┬──────┘         └──────┬──────┘
//!     stdout lines          stdout lines            stdout lines
//!         ▼                      ▼                       ▼
//!  ┌─────────────┐        ┌─────────────┐         ┌─────────────┐
//!  │OutputStream.│        │OutputStream.│         │OutputStream.│
//!  │ (one worker │        │  per active │         │   module)   │
//!  └──────┬──────┘        └──────┬──────┘         └──────┬──────┘
//!         │   classify: status / data / error, raw fallback
//!         ▼                      ▼                       ▼
//!  consumerA.handle()     consumerB.handle()      consumerC.handle()
//! ```
//!
//! ### Lifecycle
//! ```text
//! start(module, exe, args, consumer)
//!   ├─► existing entry? ─► stop(module)      (replace, never merge)
//!   ├─► resolve bin_dir/exe
//!   │     ├─ missing/spawn error ─► consumer gets ONE `error` message,
//!   │     │                          start returns false, no worker
//!   │     └─ Ok ─► register handle, spawn OutputStreamer, return true
//!   │
//! worker loop:
//!   ├─► next line (bounded by max_line_len)
//!   ├─► trim; skip empty
//!   ├─► classify ─ Ok  ─► deliver structured message
//!   │             └ Err ─► deliver `raw` with the original text
//!   └─► exits on: cancellation (stop/replace), end of stream,
//!       or read error (ONE `error` message, state = Crashed)
//!
//! stop(module):   remove entry ─► cancel worker ─► SIGTERM
//!                 ─► reaper waits `grace`, then kills
//! stop_all():     snapshot keys, stop each
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits            |
//! |-----------------|----------------------------------------------------------|-------------------------------|
//! | **Supervision** | Start/stop/replace module children, bulk teardown.       | [`Supervisor`]                |
//! | **Routing**     | Per-module line → message delivery, order-preserving.    | [`Message`], [`classify`]     |
//! | **Consumers**   | One-method async seam for the presentation layer.        | [`Consumer`], [`ConsumerFn`]  |
//! | **Errors**      | Launch/stream failures as delivered messages, not panics.| [`LaunchError`], [`StreamError`] |
//! | **Configuration** | Binary directory, line cap, termination grace.         | [`SupervisorConfig`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use ipcvisor::{ConsumerFn, ConsumerRef, Message, Supervisor, SupervisorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sup = Supervisor::new(SupervisorConfig::default());
//!
//!     // Route everything the "pipes" child prints to this callback.
//!     let consumer: ConsumerRef = ConsumerFn::arc("pipe-pane", |message: Message| async move {
//!         println!("[{}] {message:?}", message.as_label());
//!     });
//!
//!     let ok = sup
//!         .start("pipes", "pipe_demo", &["Hello World".into()], consumer)
//!         .await;
//!     assert!(ok);
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     sup.stop_all().await;
//! }
//! ```

mod config;
mod consumers;
mod core;
mod error;
mod messages;

// ---- Public re-exports ----

pub use config::SupervisorConfig;
pub use consumers::{Consumer, ConsumerFn, ConsumerRef};
pub use error::{ClassifyError, LaunchError, StreamError};
pub use messages::{classify, Message};
pub use self::core::{ModuleState, Supervisor};

// Optional: expose a simple built-in logging consumer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use consumers::LogWriter;
