//! End-to-end supervisor tests against real child processes.
//!
//! The structured cases drive the crate's own `echo-demo` binary; the
//! long-running and failure cases use small shell scripts written into a
//! scratch binary directory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use ipcvisor::{Consumer, Message, ModuleState, Supervisor, SupervisorConfig};

/// Collects every delivered message.
struct Recorder {
    messages: Mutex<Vec<Message>>,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
        })
    }

    fn snapshot(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl Consumer for Recorder {
    async fn handle(&self, message: &Message) {
        self.messages.lock().unwrap().push(message.clone());
    }
}

/// Polls `cond` until it holds or `timeout` elapses.
async fn wait_for(cond: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

/// Returns (bin_dir, executable name) for the bundled echo-demo binary.
fn echo_demo() -> (PathBuf, String) {
    let exe = PathBuf::from(env!("CARGO_BIN_EXE_echo-demo"));
    let dir = exe.parent().expect("bin dir").to_path_buf();
    let name = exe
        .file_name()
        .expect("bin name")
        .to_string_lossy()
        .into_owned();
    (dir, name)
}

fn supervisor_for(bin_dir: PathBuf) -> Supervisor {
    Supervisor::new(SupervisorConfig {
        bin_dir,
        grace: Duration::from_secs(2),
        ..Default::default()
    })
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[tokio::test]
async fn start_reports_missing_executable() {
    let dir = tempfile::tempdir().unwrap();
    let sup = supervisor_for(dir.path().to_path_buf());
    let rec = Recorder::new();

    let ok = sup
        .start("pipes", "pipe_demo", &["Hello".into()], rec.clone())
        .await;
    assert!(!ok);

    // Exactly one synchronous error naming the missing path.
    let msgs = rec.snapshot();
    assert_eq!(msgs.len(), 1);
    match &msgs[0] {
        Message::Error { module, error, .. } => {
            assert_eq!(module.as_deref(), Some("pipes"));
            assert!(error.contains("not found"), "error was {error:?}");
        }
        other => panic!("expected error message, got {other:?}"),
    }

    assert!(!sup.is_running("pipes").await);
    assert!(sup.list().await.is_empty());
    assert_eq!(sup.state("pipes").await, ModuleState::NotStarted);

    // No worker exists: nothing further ever arrives.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(rec.count(), 1);
}

#[tokio::test]
async fn delivers_structured_output_in_order() {
    let (bin_dir, exe) = echo_demo();
    let sup = supervisor_for(bin_dir);
    let rec = Recorder::new();

    assert!(sup.start("echo", &exe, &["ping".into()], rec.clone()).await);
    assert_eq!(sup.list().await, vec!["echo".to_string()]);
    assert_eq!(sup.state("echo").await, ModuleState::Running);

    assert!(wait_for(|| rec.count() >= 3, Duration::from_secs(10)).await);
    let msgs = rec.snapshot();
    assert_eq!(msgs[0].as_label(), "status");
    match &msgs[1] {
        Message::Data { data, source, pid, .. } => {
            assert_eq!(data, "ping");
            assert_eq!(source, "echo");
            assert!(pid.is_some());
        }
        other => panic!("expected data message, got {other:?}"),
    }
    assert_eq!(msgs[2].as_label(), "status");

    // A clean exit leaves the entry in place until an explicit stop.
    assert!(sup.is_running("echo").await);
    sup.stop("echo").await;
    assert!(sup.list().await.is_empty());
    assert_eq!(sup.state("echo").await, ModuleState::Stopped);
}

#[tokio::test]
async fn preserves_escaped_characters_end_to_end() {
    let (bin_dir, exe) = echo_demo();
    let sup = supervisor_for(bin_dir);
    let rec = Recorder::new();

    let payload = "quote:\" backslash:\\ newline:\nend";
    assert!(sup.start("echo", &exe, &[payload.into()], rec.clone()).await);
    assert!(wait_for(|| rec.count() >= 3, Duration::from_secs(10)).await);

    let data = rec
        .snapshot()
        .into_iter()
        .find_map(|m| match m {
            Message::Data { data, .. } => Some(data),
            _ => None,
        })
        .expect("no data message delivered");
    assert_eq!(data, payload);

    sup.stop_all().await;
}

#[cfg(unix)]
#[tokio::test]
async fn restart_replaces_the_previous_process() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "ticker.sh",
        "#!/bin/sh\nwhile :; do\n  printf '{\"type\":\"status\",\"message\":\"tick %s\"}\\n' \"$1\"\n  sleep 0.05\ndone\n",
    );
    let sup = supervisor_for(dir.path().to_path_buf());
    let cb_a = Recorder::new();
    let cb_b = Recorder::new();

    assert!(
        sup.start("shm", "ticker.sh", &["first".into()], cb_a.clone())
            .await
    );
    assert!(wait_for(|| cb_a.count() >= 1, Duration::from_secs(10)).await);
    let old_pid = sup.pid("shm").await.expect("no pid for shm");

    assert!(
        sup.start("shm", "ticker.sh", &["second".into()], cb_b.clone())
            .await
    );

    // Still exactly one entry for the key, now backed by a new process.
    assert_eq!(sup.list().await, vec!["shm".to_string()]);
    let new_pid = sup.pid("shm").await.expect("no pid after restart");
    assert_ne!(old_pid, new_pid);

    // The displaced child goes away and only the new consumer sees output.
    assert!(wait_for(|| !process_alive(old_pid), Duration::from_secs(10)).await);
    assert!(wait_for(|| cb_b.count() >= 2, Duration::from_secs(10)).await);
    assert!(cb_b
        .snapshot()
        .iter()
        .all(|m| matches!(m, Message::Status { message, .. } if message == "tick second")));

    tokio::time::sleep(Duration::from_millis(200)).await;
    let settled = cb_a.count();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(cb_a.count(), settled, "first consumer kept receiving output");

    sup.stop_all().await;
}

#[cfg(unix)]
#[tokio::test]
async fn stop_all_clears_registry_and_children() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "ticker.sh",
        "#!/bin/sh\nwhile :; do\n  printf '{\"type\":\"status\",\"message\":\"tick\"}\\n'\n  sleep 0.05\ndone\n",
    );
    let sup = supervisor_for(dir.path().to_path_buf());
    let rec_a = Recorder::new();
    let rec_b = Recorder::new();

    assert!(sup.start("pipes", "ticker.sh", &[], rec_a.clone()).await);
    assert!(sup.start("sockets", "ticker.sh", &[], rec_b.clone()).await);
    assert_eq!(
        sup.list().await,
        vec!["pipes".to_string(), "sockets".to_string()]
    );

    let pid_a = sup.pid("pipes").await.unwrap();
    let pid_b = sup.pid("sockets").await.unwrap();

    sup.stop_all().await;
    assert!(sup.list().await.is_empty());
    assert!(!sup.is_running("pipes").await);
    assert!(!sup.is_running("sockets").await);

    assert!(wait_for(|| !process_alive(pid_a), Duration::from_secs(10)).await);
    assert!(wait_for(|| !process_alive(pid_b), Duration::from_secs(10)).await);
}

#[cfg(unix)]
#[tokio::test]
async fn downgrades_unparseable_lines_to_raw() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "mixed.sh",
        "#!/bin/sh\nprintf 'plain text line\\n'\nprintf '\\n'\nprintf '   \\n'\nprintf '{\"type\":\"status\",\"message\":\"done\"}\\n'\n",
    );
    let sup = supervisor_for(dir.path().to_path_buf());
    let rec = Recorder::new();

    assert!(sup.start("sockets", "mixed.sh", &[], rec.clone()).await);
    assert!(wait_for(|| rec.count() >= 2, Duration::from_secs(10)).await);

    // Blank lines are skipped; the rest arrives in order.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let msgs = rec.snapshot();
    assert_eq!(msgs.len(), 2);
    assert_eq!(
        msgs[0],
        Message::Raw {
            module: "sockets".into(),
            data: "plain text line".into(),
        }
    );
    assert_eq!(msgs[1].as_label(), "status");

    sup.stop_all().await;
}

#[cfg(unix)]
#[tokio::test]
async fn delivers_lines_in_arrival_order() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "seq.sh",
        "#!/bin/sh\ni=0\nwhile [ $i -lt 20 ]; do\n  printf '{\"type\":\"data\",\"data\":\"%s\",\"source\":\"seq\"}\\n' \"$i\"\n  i=$((i+1))\ndone\n",
    );
    let sup = supervisor_for(dir.path().to_path_buf());
    let rec = Recorder::new();

    assert!(sup.start("pipes", "seq.sh", &[], rec.clone()).await);
    assert!(wait_for(|| rec.count() >= 20, Duration::from_secs(10)).await);

    let delivered: Vec<String> = rec
        .snapshot()
        .into_iter()
        .filter_map(|m| match m {
            Message::Data { data, .. } => Some(data),
            _ => None,
        })
        .collect();
    let expected: Vec<String> = (0..20).map(|i| i.to_string()).collect();
    assert_eq!(delivered, expected);

    sup.stop_all().await;
}

#[cfg(unix)]
#[tokio::test]
async fn oversized_line_fails_the_stream() {
    let dir = tempfile::tempdir().unwrap();
    write_script(
        dir.path(),
        "wide.sh",
        "#!/bin/sh\nprintf '{\"type\":\"status\",\"message\":\"small\"}\\n'\nhead -c 2048 /dev/zero | tr '\\0' 'x'\nprintf '\\n'\nprintf '{\"type\":\"status\",\"message\":\"after\"}\\n'\n",
    );
    let sup = Supervisor::new(SupervisorConfig {
        bin_dir: dir.path().to_path_buf(),
        max_line_len: 256,
        grace: Duration::from_secs(2),
    });
    let rec = Recorder::new();

    assert!(sup.start("shm", "wide.sh", &[], rec.clone()).await);
    assert!(
        wait_for(
            || rec.snapshot().iter().any(|m| m.as_label() == "error"),
            Duration::from_secs(10)
        )
        .await
    );
    assert_eq!(sup.state("shm").await, ModuleState::Crashed);

    // The worker is gone: nothing after the error, ever.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let msgs = rec.snapshot();
    assert_eq!(msgs.last().unwrap().as_label(), "error");
    assert!(
        !msgs
            .iter()
            .any(|m| matches!(m, Message::Status { message, .. } if message == "after")),
        "lines past the failure were delivered"
    );

    // The stale entry stays until an explicit stop; the state stays Crashed.
    assert!(sup.is_running("shm").await);
    sup.stop("shm").await;
    assert!(!sup.is_running("shm").await);
    assert_eq!(sup.state("shm").await, ModuleState::Crashed);
}

#[tokio::test]
async fn stop_without_entry_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let sup = supervisor_for(dir.path().to_path_buf());
    sup.stop("pipes").await;
    sup.stop_all().await;
    assert!(sup.list().await.is_empty());
    assert_eq!(sup.state("pipes").await, ModuleState::NotStarted);
}

#[tokio::test]
async fn failed_start_leaves_module_startable() {
    let (bin_dir, exe) = echo_demo();
    let sup = supervisor_for(bin_dir);
    let rec = Recorder::new();

    assert!(!sup.start("echo", "no_such_demo", &[], rec.clone()).await);
    assert_eq!(sup.state("echo").await, ModuleState::NotStarted);

    let rec2 = Recorder::new();
    assert!(sup.start("echo", &exe, &["again".into()], rec2.clone()).await);
    assert_eq!(sup.state("echo").await, ModuleState::Running);
    assert!(wait_for(|| rec2.count() >= 3, Duration::from_secs(10)).await);

    sup.stop_all().await;
}
