//! WAV encoding of a finished frame buffer.
//!
//! Converts accumulated f32 samples to mono 16-bit little-endian PCM at the
//! fixed 16 kHz rate. The output container is plain WAV so any decoder can
//! round-trip it for verification.

use std::path::Path;

use anyhow::{Context, Result};

use crate::audio::{FrameBuffer, SAMPLE_RATE};

/// Result of an encode attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOutcome {
    /// File was written with the given number of samples
    Written(usize),
    /// Buffer was empty; no file was created
    Skipped,
}

/// Encodes a frame buffer to a 16-bit mono PCM WAV file.
///
/// Each float sample `s` maps to `round(s * 32767)` clamped to the i16
/// range. An empty buffer writes nothing and reports `Skipped`; this is not
/// an error, a channel can legitimately end a session without audio.
///
/// # Errors
/// - If the file cannot be created
/// - If writing or finalizing the WAV data fails
pub fn encode_wav(buffer: &FrameBuffer, path: &Path) -> Result<EncodeOutcome> {
    if buffer.is_empty() {
        tracing::info!("No audio captured, skipping {}", path.display());
        return Ok(EncodeOutcome::Skipped);
    }

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;

    for sample in buffer.samples() {
        writer
            .write_sample(sample_to_i16(sample))
            .with_context(|| format!("Failed to write samples to {}", path.display()))?;
    }

    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file {}", path.display()))?;

    tracing::info!(
        "Audio saved: {} ({} samples, {:.2}s)",
        path.display(),
        buffer.len(),
        buffer.duration_seconds()
    );

    Ok(EncodeOutcome::Written(buffer.len()))
}

/// Converts one float sample to 16-bit PCM, clamping out-of-range input.
fn sample_to_i16(sample: f32) -> i16 {
    (sample * 32767.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_samples(path: &Path) -> Vec<i16> {
        let mut reader = hound::WavReader::open(path).unwrap();
        reader.samples::<i16>().map(|s| s.unwrap()).collect()
    }

    #[test]
    fn round_trip_stays_within_quantization_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tone.wav");

        let original: Vec<f32> = (0..1600)
            .map(|i| (i as f32 * 0.05).sin() * 0.8)
            .collect();
        let mut buffer = FrameBuffer::new();
        buffer.push_block(original.clone());

        let outcome = encode_wav(&buffer, &path).unwrap();
        assert_eq!(outcome, EncodeOutcome::Written(1600));

        let decoded = read_samples(&path);
        assert_eq!(decoded.len(), original.len());
        for (orig, dec) in original.iter().zip(&decoded) {
            let restored = *dec as f32 / 32767.0;
            assert!(
                (orig - restored).abs() <= 1.0 / 32767.0,
                "sample {orig} decoded as {restored}"
            );
        }
    }

    #[test]
    fn wav_header_is_mono_16bit_16khz() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("header.wav");

        let mut buffer = FrameBuffer::new();
        buffer.push_block(vec![0.0; 160]);
        encode_wav(&buffer, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    }

    #[test]
    fn empty_buffer_writes_no_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.wav");

        let outcome = encode_wav(&FrameBuffer::new(), &path).unwrap();
        assert_eq!(outcome, EncodeOutcome::Skipped);
        assert!(!path.exists());
    }

    #[test]
    fn out_of_range_samples_clamp() {
        assert_eq!(sample_to_i16(1.5), i16::MAX);
        assert_eq!(sample_to_i16(-1.5), i16::MIN);
        assert_eq!(sample_to_i16(0.0), 0);
        assert_eq!(sample_to_i16(1.0), i16::MAX);
    }
}
