//! # Line classification.
//!
//! [`classify`] turns one non-empty, trimmed line of child output into a
//! [`Message`]. It is pure and stateless: parse failure is reported to the
//! caller rather than wrapped, so the classifier needs no knowledge of which
//! module produced the line — the output worker owns the `raw` fallback.

use crate::error::ClassifyError;
use crate::messages::Message;

/// Parses one line of child output as a structured message.
///
/// The line must be a single JSON document matching the message envelope
/// (`type` tag plus kind-specific fields); anything else — plain text,
/// non-object JSON, an unknown `type` — is a [`ClassifyError`]. Fields beyond
/// the envelope are ignored.
///
/// # Example
/// ```
/// let msg = ipcvisor::classify(r#"{"type":"data","data":"hi","source":"echo"}"#).unwrap();
/// assert_eq!(msg.as_label(), "data");
///
/// assert!(ipcvisor::classify("plain text").is_err());
/// ```
pub fn classify(line: &str) -> Result<Message, ClassifyError> {
    let message = serde_json::from_str(line)?;
    Ok(message)
}
