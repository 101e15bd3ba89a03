//! # Global supervisor configuration.
//!
//! [`SupervisorConfig`] defines where child executables are resolved, how much
//! of a single output line the runtime is willing to buffer, and how long a
//! stopped child is given to exit before it is force-killed.
//!
//! # Example
//! ```
//! use std::path::PathBuf;
//! use std::time::Duration;
//! use ipcvisor::SupervisorConfig;
//!
//! let mut cfg = SupervisorConfig::default();
//! cfg.bin_dir = PathBuf::from("target/debug");
//! cfg.grace = Duration::from_secs(2);
//!
//! assert_eq!(cfg.max_line_len, 64 * 1024);
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a [`Supervisor`](crate::Supervisor).
///
/// Controls executable resolution, per-line buffering, and termination grace.
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Directory child executables are resolved in. Executable names passed to
    /// [`Supervisor::start`](crate::Supervisor::start) must be bare file names
    /// inside this directory.
    pub bin_dir: PathBuf,
    /// Maximum number of bytes buffered for a single output line. A child
    /// emitting a longer line is treated as a stream failure.
    pub max_line_len: usize,
    /// How long a terminated child may take to exit before it is killed.
    pub grace: Duration,
}

impl Default for SupervisorConfig {
    /// Provides a default configuration:
    /// - `bin_dir = "build"`
    /// - `max_line_len = 64 KiB`
    /// - `grace = 5s`
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("build"),
            max_line_len: 64 * 1024,
            grace: Duration::from_secs(5),
        }
    }
}
