//! Offset timestamp rendering and parsing.
//!
//! Segment offsets are durations from recording start, rendered in
//! wall-clock shape (`HH:MM:SS`, zero-padded, hours wrapping at 24). The
//! fixed width makes the rendered start timestamp a valid lexicographic
//! sort key: for zero-padded digits, string order equals chronological
//! order within a 24-hour window. The merge stage depends on both the
//! format and that property, so they live together here.

use std::sync::OnceLock;

use regex::Regex;

/// Matches a transcript line's leading `[HH:MM:SS - HH:MM:SS]` span and
/// captures the start timestamp.
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\[(\d{2}:\d{2}:\d{2}) - \d{2}:\d{2}:\d{2}\]").expect("valid regex")
    })
}

/// Renders an offset in seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated and hours wrap at 24, matching
/// wall-clock formatting of a duration.
pub fn format_offset(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = (total / 3600) % 24;
    let minutes = (total / 60) % 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Extracts the start timestamp string from a rendered transcript line.
///
/// Returns `None` for lines that don't begin with a well-formed
/// `[HH:MM:SS - HH:MM:SS]` span; callers skip those.
pub fn parse_start_timestamp(line: &str) -> Option<String> {
    line_pattern()
        .captures(line)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(format_offset(0.0), "00:00:00");
        assert_eq!(format_offset(1.0), "00:00:01");
        assert_eq!(format_offset(61.5), "00:01:01");
        assert_eq!(format_offset(3661.0), "01:01:01");
    }

    #[test]
    fn truncates_fractional_seconds() {
        assert_eq!(format_offset(0.99), "00:00:00");
        assert_eq!(format_offset(59.999), "00:00:59");
    }

    #[test]
    fn hours_wrap_at_24() {
        assert_eq!(format_offset(24.0 * 3600.0), "00:00:00");
        assert_eq!(format_offset(25.0 * 3600.0 + 62.0), "01:01:02");
    }

    #[test]
    fn negative_offsets_clamp_to_zero() {
        assert_eq!(format_offset(-5.0), "00:00:00");
    }

    #[test]
    fn parses_start_timestamp_from_rendered_line() {
        assert_eq!(
            parse_start_timestamp("[00:00:01 - 00:00:02] hello"),
            Some("00:00:01".to_string())
        );
        assert_eq!(
            parse_start_timestamp("[12:34:56 - 12:35:00]"),
            Some("12:34:56".to_string())
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse_start_timestamp("no timestamp here"), None);
        assert_eq!(parse_start_timestamp("[0:0:1 - 0:0:2] short fields"), None);
        assert_eq!(parse_start_timestamp("Transcription completed in 1.23 seconds."), None);
        assert_eq!(parse_start_timestamp(""), None);
    }

    #[test]
    fn fixed_width_keys_sort_chronologically() {
        let mut keys = vec![
            format_offset(3600.0),
            format_offset(59.0),
            format_offset(0.0),
            format_offset(600.0),
        ];
        keys.sort();
        assert_eq!(keys, vec!["00:00:00", "00:00:59", "00:10:00", "01:00:00"]);
    }
}
