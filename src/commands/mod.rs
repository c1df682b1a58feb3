//! Application command handlers for tandem.
//!
//! This module organizes command handling into separate submodules, each
//! responsible for a specific application command.
//!
//! # Commands
//! - `record`: dual-channel recording session with transcription and merge
//! - `transcribe`: transcribe an existing audio file as one channel
//! - `merge`: combine two per-channel transcript files
//! - `list_devices`: list available audio input devices
//! - `config`: open configuration file in the user's preferred editor
//! - `logs`: display recent log entries

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod merge;
pub mod record;
pub mod transcribe;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use merge::handle_merge;
pub use record::handle_record;
pub use transcribe::handle_transcribe;
