//! Chronological merge of the two per-channel transcripts.
//!
//! Every qualifying line from both files is parsed into
//! `(start_timestamp, source, raw_line)`, the two line sets are
//! concatenated (channel A first), and the whole sequence is stably sorted
//! by the start-timestamp string. Each input file is already chronological
//! on its own, but the combined ordering is a full re-sort: the key is
//! total and comparable, so the result is correct, and the stable sort
//! makes the tie-break deterministic: at equal timestamps channel A's
//! line precedes channel B's. That tie-break is defined behavior, relied
//! on by callers and tests.

use std::path::Path;

use anyhow::{Context, Result};

use crate::channel::ChannelId;

use super::timestamp::parse_start_timestamp;
use super::writer::SUMMARY_LINE_PREFIX;

/// One parsed line ready for the combined sort.
#[derive(Debug, Clone)]
struct MergeEntry {
    timestamp_key: String,
    source: ChannelId,
    raw_line: String,
}

/// Merges two per-channel transcript files into a combined, source-tagged
/// transcript. Returns the number of merged lines.
///
/// A missing or empty input file contributes zero lines; a channel whose
/// transcription failed must not block the other channel's lines from
/// being combined. Malformed lines are skipped with a warning.
///
/// # Errors
/// - If an existing input file cannot be read
/// - If the combined file cannot be written
pub fn merge_transcripts(
    channel_a_path: &Path,
    channel_b_path: &Path,
    combined_path: &Path,
) -> Result<usize> {
    let mut entries = read_channel_lines(channel_a_path, ChannelId::A)?;
    entries.extend(read_channel_lines(channel_b_path, ChannelId::B)?);

    // Stable sort on the fixed-width timestamp string; equal keys keep the
    // A-before-B concatenation order
    entries.sort_by(|a, b| a.timestamp_key.cmp(&b.timestamp_key));

    let mut output = String::new();
    for entry in &entries {
        output.push_str(entry.source.label());
        output.push_str(": ");
        output.push_str(&entry.raw_line);
        output.push('\n');
    }

    std::fs::write(combined_path, output)
        .with_context(|| format!("Failed to write combined transcript {}", combined_path.display()))?;

    Ok(entries.len())
}

/// Reads and parses one channel's transcript lines.
///
/// Blank lines and the trailing summary line are excluded from merge
/// input. Lines without a well-formed leading timestamp are skipped, not
/// fatal: one bad line must not abort the whole merge.
fn read_channel_lines(path: &Path, source: ChannelId) -> Result<Vec<MergeEntry>> {
    if !path.exists() {
        tracing::warn!(
            "{source}: transcript {} is missing, merging zero lines",
            path.display()
        );
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript file {}", path.display()))?;

    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(SUMMARY_LINE_PREFIX) {
            continue;
        }

        match parse_start_timestamp(line) {
            Some(timestamp_key) => entries.push(MergeEntry {
                timestamp_key,
                source,
                raw_line: line.to_string(),
            }),
            None => {
                tracing::warn!("{source}: skipping malformed transcript line: {line}");
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn merge_to_string(a: &Path, b: &Path, dir: &TempDir) -> (usize, String) {
        let out = dir.path().join("combined.txt");
        let count = merge_transcripts(a, b, &out).unwrap();
        (count, std::fs::read_to_string(&out).unwrap())
    }

    #[test]
    fn interleaves_by_start_timestamp() {
        let temp = TempDir::new().unwrap();
        let a = write_file(&temp, "a.txt", "[00:00:01 - 00:00:02] hello\n");
        let b = write_file(&temp, "b.txt", "[00:00:00 - 00:00:01] world\n");

        let (count, combined) = merge_to_string(&a, &b, &temp);
        assert_eq!(count, 2);
        assert_eq!(
            combined,
            "Channel B: [00:00:00 - 00:00:01] world\n\
             Channel A: [00:00:01 - 00:00:02] hello\n"
        );
    }

    #[test]
    fn empty_channel_b_yields_channel_a_lines_in_order() {
        let temp = TempDir::new().unwrap();
        let a = write_file(
            &temp,
            "a.txt",
            "[00:00:00 - 00:00:01] first\n[00:00:05 - 00:00:06] second\n",
        );
        let b = write_file(&temp, "b.txt", "");

        let (count, combined) = merge_to_string(&a, &b, &temp);
        assert_eq!(count, 2);
        assert_eq!(
            combined,
            "Channel A: [00:00:00 - 00:00:01] first\n\
             Channel A: [00:00:05 - 00:00:06] second\n"
        );
    }

    #[test]
    fn missing_channel_file_merges_as_zero_lines() {
        let temp = TempDir::new().unwrap();
        let a = write_file(&temp, "a.txt", "[00:00:00 - 00:00:01] only channel\n");
        let missing = temp.path().join("does_not_exist.txt");

        let (count, combined) = merge_to_string(&a, &missing, &temp);
        assert_eq!(count, 1);
        assert_eq!(combined, "Channel A: [00:00:00 - 00:00:01] only channel\n");
    }

    #[test]
    fn equal_timestamps_keep_a_before_b() {
        let temp = TempDir::new().unwrap();
        let a = write_file(&temp, "a.txt", "[00:00:03 - 00:00:04] from a\n");
        let b = write_file(&temp, "b.txt", "[00:00:03 - 00:00:04] from b\n");

        let (_, combined) = merge_to_string(&a, &b, &temp);
        assert_eq!(
            combined,
            "Channel A: [00:00:03 - 00:00:04] from a\n\
             Channel B: [00:00:03 - 00:00:04] from b\n"
        );
    }

    #[test]
    fn summary_and_blank_lines_are_excluded() {
        let temp = TempDir::new().unwrap();
        let a = write_file(
            &temp,
            "a.txt",
            "[00:00:00 - 00:00:01] speech\n\nTranscription completed in 4.20 seconds.\n",
        );
        let b = write_file(
            &temp,
            "b.txt",
            "\nTranscription completed in 0.10 seconds.\n",
        );

        let (count, combined) = merge_to_string(&a, &b, &temp);
        assert_eq!(count, 1);
        assert_eq!(combined, "Channel A: [00:00:00 - 00:00:01] speech\n");
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let temp = TempDir::new().unwrap();
        let a = write_file(
            &temp,
            "a.txt",
            "garbage line\n[00:00:02 - 00:00:03] kept\n[bad - stamp] also garbage\n",
        );
        let b = write_file(&temp, "b.txt", "");

        let (count, combined) = merge_to_string(&a, &b, &temp);
        assert_eq!(count, 1);
        assert_eq!(combined, "Channel A: [00:00:02 - 00:00:03] kept\n");
    }

    #[test]
    fn later_hours_sort_after_earlier_ones() {
        let temp = TempDir::new().unwrap();
        let a = write_file(&temp, "a.txt", "[01:00:00 - 01:00:05] late a\n");
        let b = write_file(
            &temp,
            "b.txt",
            "[00:59:59 - 01:00:00] just before\n[01:00:01 - 01:00:02] just after\n",
        );

        let (_, combined) = merge_to_string(&a, &b, &temp);
        assert_eq!(
            combined,
            "Channel B: [00:59:59 - 01:00:00] just before\n\
             Channel A: [01:00:00 - 01:00:05] late a\n\
             Channel B: [01:00:01 - 01:00:02] just after\n"
        );
    }
}
