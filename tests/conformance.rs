//! Conformance checks for the bundled demonstration binary.
//!
//! The contract is the one every demo backend must honor: invoked with one
//! positional string argument, every non-blank stdout line is independently
//! parseable under the message envelope, and at least one line parses. A
//! separate check requires quoting fidelity for hostile payloads.

use std::process::Command;

use ipcvisor::{classify, Message};

fn run_demo(arg: &str) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_echo-demo"))
        .arg(arg)
        .output()
        .expect("failed to run echo-demo");
    assert!(output.status.success(), "echo-demo exited with failure");
    String::from_utf8(output.stdout).expect("stdout was not utf-8")
}

#[test]
fn every_line_is_independently_parseable() {
    let stdout = run_demo("conformance probe");

    let mut parsed = 0;
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message =
            classify(line).unwrap_or_else(|err| panic!("unparseable line {line:?}: {err}"));
        assert!(message.pid().is_some(), "line missing pid: {line:?}");
        parsed += 1;
    }
    assert!(parsed >= 1, "no valid lines produced");
}

#[test]
fn preserves_quotes_backslashes_and_newlines() {
    // A double quote, a backslash, a literal newline, and the two-character
    // "\n" sequence, all in one argument.
    let payload = "has \"quotes\", a \\backslash\\, an embedded\nbreak, and a literal \\n";
    let stdout = run_demo(payload);

    let data = stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| classify(l.trim()).ok())
        .find_map(|m| match m {
            Message::Data { data, .. } => Some(data),
            _ => None,
        })
        .expect("no data line produced");

    assert_eq!(data, payload);
    assert!(data.contains('"'));
    assert!(data.contains('\\'));
    assert!(data.contains('\n'));
}
