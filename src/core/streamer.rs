//! # OutputStreamer: per-module output worker.
//!
//! One streamer exists per active module. It reads the child's standard
//! output line by line, classifies each line, and delivers the result to the
//! module's bound consumer.
//!
//! ## Per-line flow
//! ```text
//! read line ──► trim ──► empty? skip
//!                  │
//!                  ▼
//!              classify(line)
//!                  ├─ Ok(message)  ──► consumer.handle(&message)
//!                  └─ Err(_)       ──► consumer.handle(&raw(module, line))
//! ```
//!
//! ## Exit conditions
//! - cancellation (stop / replace): no further delivery
//! - end of stream: worker ends silently; the registry entry stays
//! - read error (including an oversized line): exactly one synthetic `error`
//!   message, state becomes `Crashed`, worker ends
//!
//! ## Rules
//! - Malformed lines are downgraded to `raw`, never dropped
//! - Delivery is sequential on this worker; order equals line arrival order
//! - A panicking consumer is caught and logged; it never takes down the worker

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::{FutureExt, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout};
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::consumers::ConsumerRef;
use crate::core::state::{ModuleState, StateTracker};
use crate::error::StreamError;
use crate::messages::{classify, Message};

/// Reads, classifies, and delivers one module's output.
pub(crate) struct OutputStreamer {
    module: String,
    pid: Option<u32>,
    consumer: ConsumerRef,
    cancel: CancellationToken,
    max_line_len: usize,
    states: Arc<StateTracker>,
}

impl OutputStreamer {
    /// Creates a streamer for one freshly started module.
    pub fn new(
        module: String,
        pid: Option<u32>,
        consumer: ConsumerRef,
        cancel: CancellationToken,
        max_line_len: usize,
        states: Arc<StateTracker>,
    ) -> Self {
        Self {
            module,
            pid,
            consumer,
            cancel,
            max_line_len,
            states,
        }
    }

    /// Runs until cancellation, end of stream, or a read error.
    pub async fn run(self, stdout: ChildStdout) {
        let codec = LinesCodec::new_with_max_length(self.max_line_len);
        let mut lines = FramedRead::new(stdout, codec);

        loop {
            let item = tokio::select! {
                _ = self.cancel.cancelled() => break,
                item = lines.next() => item,
            };

            match item {
                None => {
                    debug!(module = %self.module, "stdout closed, worker ending");
                    break;
                }
                Some(Ok(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    // A stop/replace issued while this line was in the buffer
                    // must not reach the displaced consumer.
                    if self.cancel.is_cancelled() {
                        break;
                    }
                    match classify(line) {
                        Ok(message) => self.deliver(&message).await,
                        Err(err) => {
                            debug!(module = %self.module, %err, "delivering unclassifiable line as raw");
                            self.deliver(&Message::raw(self.module.as_str(), line)).await;
                        }
                    }
                }
                Some(Err(err)) => {
                    let err = StreamError::from_codec(err, self.max_line_len);
                    warn!(module = %self.module, error = err.as_label(), "stream failed, worker ending");
                    self.states.set(&self.module, ModuleState::Crashed).await;
                    self.deliver(&Message::stream_error(&self.module, self.pid, &err))
                        .await;
                    break;
                }
            }
        }
    }

    /// Delivers one message, isolating the worker from consumer panics.
    async fn deliver(&self, message: &Message) {
        let fut = self.consumer.handle(message);
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            warn!(
                module = %self.module,
                consumer = self.consumer.name(),
                ?panic,
                "consumer panicked while handling a message"
            );
        }
    }
}

/// Drains a child's standard error at debug level so a chatty child cannot
/// fill the pipe. Stderr never enters the message path.
pub(crate) async fn drain_stderr(module: String, stderr: ChildStderr, cancel: CancellationToken) {
    let mut lines = BufReader::new(stderr).lines();
    loop {
        let res = tokio::select! {
            _ = cancel.cancelled() => break,
            res = lines.next_line() => res,
        };
        match res {
            Ok(Some(line)) => debug!(module = %module, line = %line, "child stderr"),
            Ok(None) | Err(_) => break,
        }
    }
}
