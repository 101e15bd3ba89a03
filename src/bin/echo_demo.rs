//! Line-protocol demonstration binary.
//!
//! Echoes its single positional argument back through the structured line
//! protocol: one `status` line, one `data` line carrying the argument, one
//! closing `status` line. Serialization goes through [`Message`], so quoting
//! and escaping are correct by construction.
//!
//! Stands in for the native IPC demos when exercising the supervisor:
//! ```text
//! echo-demo "Hello World"
//! {"type":"status","module":"echo","message":"starting echo demonstration",...}
//! {"type":"data","module":"echo","data":"Hello World","source":"echo",...}
//! {"type":"status","module":"echo","message":"echo demonstration complete",...}
//! ```

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use ipcvisor::Message;

const MODULE: &str = "echo";

fn main() {
    let payload = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Default Echo Message".to_string());
    let pid = std::process::id();

    emit(&Message::Status {
        module: Some(MODULE.to_string()),
        message: "starting echo demonstration".to_string(),
        pid: Some(pid),
        timestamp: now(),
    });

    emit(&Message::Data {
        module: Some(MODULE.to_string()),
        data: payload,
        source: "echo".to_string(),
        pid: Some(pid),
        timestamp: now(),
    });

    emit(&Message::Status {
        module: Some(MODULE.to_string()),
        message: "echo demonstration complete".to_string(),
        pid: Some(pid),
        timestamp: now(),
    });
}

/// Prints one message per line and flushes, so the supervisor sees each line
/// as it is produced rather than at process exit.
fn emit(message: &Message) {
    if let Ok(line) = serde_json::to_string(message) {
        println!("{line}");
        let _ = std::io::stdout().flush();
    }
}

fn now() -> Option<i64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs() as i64)
}
