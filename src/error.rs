//! Error types used by the supervisor runtime.
//!
//! This module defines three error types:
//!
//! - [`LaunchError`] — a child process could not be started.
//! - [`StreamError`] — reading a child's output failed after a successful start.
//! - [`ClassifyError`] — a single output line is not a structured message.
//!
//! None of these propagate out of [`Supervisor`](crate::Supervisor) calls:
//! launch and stream failures are converted into delivered `error` messages
//! (and a `false` return for `start`), and classification failures are
//! recovered per line as `raw` messages. The types exist so those conversions
//! stay explicit, and provide `as_label` helpers for logs.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// # Errors produced while launching a child process.
///
/// All variants result in a single synthetic `error` message delivered to the
/// module's consumer; no process handle or worker exists afterwards.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The resolved executable path does not exist in the binary directory.
    #[error("executable not found: {path}")]
    NotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// The executable name is not a bare file name (contains separators or
    /// parent components), so it cannot resolve inside the binary directory.
    #[error("invalid executable name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The OS refused to spawn the process (permissions, resources, ...).
    #[error("failed to spawn {path}: {source}")]
    Spawn {
        /// The path that was spawned.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            LaunchError::NotFound { .. } => "launch_not_found",
            LaunchError::InvalidName { .. } => "launch_invalid_name",
            LaunchError::Spawn { .. } => "launch_spawn_failed",
        }
    }
}

/// # Errors produced while streaming a child's output.
///
/// A stream error terminates the module's output worker after exactly one
/// synthetic `error` message; the registry entry stays until an explicit
/// `stop` or a superseding `start`.
#[derive(Error, Debug)]
pub enum StreamError {
    /// A single line exceeded the configured buffer cap.
    #[error("line exceeds maximum length of {max} bytes")]
    LineTooLong {
        /// The configured maximum line length.
        max: usize,
    },

    /// Reading from the child's standard output failed.
    #[error("read failed: {source}")]
    Io {
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    /// Maps a line-codec failure onto the stream error model.
    pub(crate) fn from_codec(err: LinesCodecError, max: usize) -> Self {
        match err {
            LinesCodecError::MaxLineLengthExceeded => StreamError::LineTooLong { max },
            LinesCodecError::Io(source) => StreamError::Io { source },
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StreamError::LineTooLong { .. } => "stream_line_too_long",
            StreamError::Io { .. } => "stream_io",
        }
    }
}

/// A line of child output is not a well-formed structured message.
///
/// Signalled by [`classify`](crate::classify); the output worker recovers by
/// delivering the line as a `raw` message instead.
#[derive(Error, Debug)]
#[error("not a structured message: {0}")]
pub struct ClassifyError(#[from] serde_json::Error);
