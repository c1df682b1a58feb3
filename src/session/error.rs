//! Typed session errors.
//!
//! Only the two blocking, user-facing failures are typed: a session that
//! cannot start and a control command with no session to act on. Everything
//! else (device read failures, transcription failures, malformed merge
//! lines) degrades to partial output and is reported through the finalize
//! report and the log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Session start rejected: a channel device is missing or not
    /// input-capable. The session stays Idle.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Stop or pause requested while no recording is in progress.
    #[error("no recording in progress")]
    NotRecording,
}
