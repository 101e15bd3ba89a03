//! Child process launching.
//!
//! Resolves an executable name inside the configured binary directory and
//! spawns it with piped standard streams, or fails explicitly. No partial
//! process object escapes the failure paths.

use std::path::{Component, Path};
use std::process::Stdio;

use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::debug;

use crate::error::LaunchError;

/// A freshly spawned child with its output streams detached for the workers.
#[derive(Debug)]
pub(crate) struct Spawned {
    /// The child handle (streams already taken).
    pub child: Child,
    /// The child's standard output, line-consumed by the output streamer.
    pub stdout: ChildStdout,
    /// The child's standard error, drained at debug level.
    pub stderr: ChildStderr,
    /// OS process id, if the child is still running at capture time.
    pub pid: Option<u32>,
}

/// Spawns `executable` from `bin_dir` with the given positional arguments.
///
/// The name must be a bare file name; anything carrying separators or parent
/// components cannot resolve inside the binary directory and is rejected
/// before the filesystem is consulted. A missing path is reported without
/// spawning. Stdout and stderr are piped so lines become visible to the
/// readers as the child emits them; stdin is closed.
pub(crate) fn launch(
    module: &str,
    bin_dir: &Path,
    executable: &str,
    args: &[String],
) -> Result<Spawned, LaunchError> {
    let mut components = Path::new(executable).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => {
            return Err(LaunchError::InvalidName {
                name: executable.to_string(),
            })
        }
    }

    let path = bin_dir.join(executable);
    if !path.exists() {
        return Err(LaunchError::NotFound { path });
    }

    debug!(module, path = %path.display(), ?args, "spawning child process");

    let mut child = Command::new(&path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            path: path.clone(),
            source,
        })?;

    let stdout = child.stdout.take().ok_or_else(|| LaunchError::Spawn {
        path: path.clone(),
        source: std::io::Error::other("child stdout was not captured"),
    })?;
    let stderr = child.stderr.take().ok_or_else(|| LaunchError::Spawn {
        path: path.clone(),
        source: std::io::Error::other("child stderr was not captured"),
    })?;
    let pid = child.id();

    Ok(Spawned {
        child,
        stdout,
        stderr,
        pid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rejects_names_with_separators() {
        let err = launch("pipes", &PathBuf::from("build"), "sub/pipe_demo", &[]).unwrap_err();
        assert_eq!(err.as_label(), "launch_invalid_name");
    }

    #[test]
    fn test_rejects_parent_components() {
        let err = launch("pipes", &PathBuf::from("build"), "..", &[]).unwrap_err();
        assert_eq!(err.as_label(), "launch_invalid_name");

        let err = launch("pipes", &PathBuf::from("build"), "", &[]).unwrap_err();
        assert_eq!(err.as_label(), "launch_invalid_name");
    }

    #[test]
    fn test_reports_missing_executable_without_spawning() {
        let dir = tempfile::tempdir().unwrap();
        let err = launch("pipes", dir.path(), "pipe_demo", &[]).unwrap_err();
        match err {
            LaunchError::NotFound { path } => {
                assert!(path.ends_with("pipe_demo"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
