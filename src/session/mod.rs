//! Recording session lifecycle.
//!
//! A session runs the state machine Idle → Recording → {Paused ↔ Recording}
//! → Stopped, drives one capture worker per channel, and on stop executes
//! the finalize chain (encode → transcribe → merge).

pub mod clock;
pub mod controller;
pub mod error;
pub mod worker;

pub use clock::{format_elapsed, SessionClock, SessionState};
pub use controller::{finalize, FinalizeReport, RecordingSession, SessionPaths};
pub use error::SessionError;
