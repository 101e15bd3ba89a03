//! # Message envelope for routed child output.
//!
//! [`Message`] is the unit delivered to a module's consumer. The three wire
//! kinds (`status`, `data`, `error`) are produced by the demonstration
//! binaries as one JSON document per line; `raw` exists only on the consumer
//! side and wraps lines that failed classification.
//!
//! Producers may attach a `module` label, their `pid`, and a unix `timestamp`
//! to any wire kind; all three are optional and pass through untouched.
//! Fields beyond the envelope are ignored on parse.
//!
//! ## Example
//! ```rust
//! use ipcvisor::Message;
//!
//! let msg = ipcvisor::classify(r#"{"type":"status","message":"ready","pid":42}"#).unwrap();
//! assert_eq!(msg.as_label(), "status");
//! assert_eq!(msg.pid(), Some(42));
//!
//! let raw = Message::raw("pipes", "plain text");
//! assert_eq!(raw.module(), Some("pipes"));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LaunchError, StreamError};

/// A classified unit of child output, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Human-readable progress report from a child.
    Status {
        /// Producer-supplied module label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        /// Status text.
        message: String,
        /// Originating process id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pid: Option<u32>,
        /// Producer-supplied unix timestamp.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Payload carried through an IPC channel, with its origin label.
    Data {
        /// Producer-supplied module label.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        /// Payload text.
        data: String,
        /// Origin label (e.g. which end of the channel produced it).
        source: String,
        /// Originating process id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pid: Option<u32>,
        /// Producer-supplied unix timestamp.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Failure report, either from the child or synthesized by the runtime.
    Error {
        /// Module the error belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        /// Error description.
        error: String,
        /// Originating process id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pid: Option<u32>,
        /// Producer-supplied unix timestamp.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<i64>,
    },

    /// Fallback for a line that failed classification; carries the line text
    /// unmodified. Synthesized by the runtime, never expected on the wire.
    Raw {
        /// The module that produced the line.
        module: String,
        /// The original line text.
        data: String,
    },
}

impl Message {
    /// Wraps an unclassifiable line for the given module.
    pub fn raw(module: impl Into<String>, line: impl Into<String>) -> Self {
        Message::Raw {
            module: module.into(),
            data: line.into(),
        }
    }

    /// Synthetic `error` for a failed launch; delivered once, synchronously.
    pub(crate) fn launch_error(module: &str, err: &LaunchError) -> Self {
        Message::Error {
            module: Some(module.to_string()),
            error: err.to_string(),
            pid: None,
            timestamp: None,
        }
    }

    /// Synthetic `error` for a failed read; delivered once, then the module's
    /// worker terminates.
    pub(crate) fn stream_error(module: &str, pid: Option<u32>, err: &StreamError) -> Self {
        Message::Error {
            module: Some(module.to_string()),
            error: format!("output reading error: {err}"),
            pid,
            timestamp: None,
        }
    }

    /// Returns the wire tag of this message.
    pub fn as_label(&self) -> &'static str {
        match self {
            Message::Status { .. } => "status",
            Message::Data { .. } => "data",
            Message::Error { .. } => "error",
            Message::Raw { .. } => "raw",
        }
    }

    /// Returns the module label, if one is attached.
    pub fn module(&self) -> Option<&str> {
        match self {
            Message::Status { module, .. }
            | Message::Data { module, .. }
            | Message::Error { module, .. } => module.as_deref(),
            Message::Raw { module, .. } => Some(module),
        }
    }

    /// Returns the originating process id, if the producer supplied one.
    pub fn pid(&self) -> Option<u32> {
        match self {
            Message::Status { pid, .. }
            | Message::Data { pid, .. }
            | Message::Error { pid, .. } => *pid,
            Message::Raw { .. } => None,
        }
    }

    /// Returns the producer-supplied timestamp, if any.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Message::Status { timestamp, .. }
            | Message::Data { timestamp, .. }
            | Message::Error { timestamp, .. } => *timestamp,
            Message::Raw { .. } => None,
        }
    }
}
