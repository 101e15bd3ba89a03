//! # Simple logging consumer for debugging and demos.
//!
//! [`LogWriter`] prints delivered messages to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [status] module=pipes pid=4242 msg="pipe created"
//! [data] module=pipes source="parent -> child" data="Hello"
//! [error] module=shm err="shmget failed"
//! [raw] module=sockets line="plain text"
//! ```

use async_trait::async_trait;

use crate::consumers::Consumer;
use crate::messages::Message;

/// Simple stdout logging consumer.
///
/// Enabled via the `logging` feature. Prints human-readable message
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Consumer`] to feed
/// a real presentation layer or structured logging.
pub struct LogWriter;

#[async_trait]
impl Consumer for LogWriter {
    async fn handle(&self, message: &Message) {
        match message {
            Message::Status { module, message, pid, .. } => {
                println!("[status] module={module:?} pid={pid:?} msg={message:?}");
            }
            Message::Data { module, data, source, .. } => {
                println!("[data] module={module:?} source={source:?} data={data:?}");
            }
            Message::Error { module, error, .. } => {
                println!("[error] module={module:?} err={error:?}");
            }
            Message::Raw { module, data } => {
                println!("[raw] module={module} line={data:?}");
            }
        }
    }

    fn name(&self) -> &str {
        "log-writer"
    }
}
