//! Configuration management for tandem.
//!
//! Loading and saving of the TOML configuration file in the user's config
//! directory. A default config is written on first run so the file is
//! always there to edit via `tandem config`.

pub mod file;

pub use file::{
    config_path, AudioConfig, OutputConfig, TandemConfig, TranscriptionSettings,
};
