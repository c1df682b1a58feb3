//! Audio capture support for tandem.
//!
//! Provides input device resolution, the per-channel frame buffer, and the
//! WAV encoder that turns a finished buffer into a PCM file.

pub mod buffer;
pub mod device;
pub mod encoder;

pub use buffer::FrameBuffer;
pub use encoder::{encode_wav, EncodeOutcome};

/// Fixed capture sample rate in Hz. Both channels record mono at this rate;
/// the transcription engines expect it and the WAV encoder stamps it.
pub const SAMPLE_RATE: u32 = 16_000;
