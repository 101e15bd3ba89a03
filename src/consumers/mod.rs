//! Consumer seam: where routed messages leave the runtime.
//!
//! Each module is bound to exactly one consumer at `start` time; the module's
//! output worker calls [`Consumer::handle`] for every delivered message until
//! the module is stopped or replaced.
//!
//! ## Implementing a consumer
//! ```no_run
//! use ipcvisor::{Consumer, Message};
//! use async_trait::async_trait;
//!
//! struct Pane;
//!
//! #[async_trait]
//! impl Consumer for Pane {
//!     async fn handle(&self, message: &Message) {
//!         // forward to the presentation context...
//!         let _ = message;
//!     }
//! }
//! ```
//!
//! For quick wiring there is [`ConsumerFn`], which adapts a plain closure.

mod consumer;
mod consumer_fn;

#[cfg(feature = "logging")]
mod log;

pub use consumer::{Consumer, ConsumerRef};
pub use consumer_fn::ConsumerFn;

#[cfg(feature = "logging")]
pub use log::LogWriter;
