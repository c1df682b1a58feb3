//! Per-channel transcript file rendering.
//!
//! Writes one line per engine segment in the form
//! `[HH:MM:SS - HH:MM:SS] text`, followed by a blank line and a trailing
//! summary line. The summary line is informational only; the merge stage
//! recognizes it by prefix and excludes it.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::transcription::Segment;

use super::timestamp::format_offset;

/// Prefix of the trailing summary line; merge input filtering keys on it.
pub const SUMMARY_LINE_PREFIX: &str = "Transcription completed";

/// Writes segments to a transcript file.
///
/// `engine_elapsed` is how long the engine call took; it only feeds the
/// summary line. A successful engine call with zero segments still writes
/// the file (summary line only), which the merger then reads as zero lines.
///
/// # Errors
/// - If the file cannot be created or written
pub fn write_transcript(
    segments: &[Segment],
    engine_elapsed: Duration,
    path: &Path,
) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create transcript file {}", path.display()))?;

    for segment in segments {
        writeln!(
            file,
            "[{} - {}] {}",
            format_offset(segment.start),
            format_offset(segment.end),
            segment.text.trim()
        )
        .with_context(|| format!("Failed to write transcript line to {}", path.display()))?;
    }

    writeln!(file)?;
    writeln!(
        file,
        "{SUMMARY_LINE_PREFIX} in {:.2} seconds.",
        engine_elapsed.as_secs_f64()
    )?;

    tracing::info!(
        "Transcript written: {} ({} segments)",
        path.display(),
        segments.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn segment(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn renders_segments_with_timestamps_and_trimmed_text() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("transcript.txt");

        let segments = vec![
            segment(0.0, 2.5, "  hello there  "),
            segment(2.5, 100.0, "more speech"),
        ];
        write_transcript(&segments, Duration::from_millis(1230), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "[00:00:00 - 00:00:02] hello there");
        assert_eq!(lines[1], "[00:00:02 - 00:01:40] more speech");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Transcription completed in 1.23 seconds.");
    }

    #[test]
    fn empty_segment_list_still_writes_summary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.txt");

        write_transcript(&[], Duration::from_secs(2), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(SUMMARY_LINE_PREFIX));
    }
}
