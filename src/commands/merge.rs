//! Merge two per-channel transcript files.
//!
//! Standalone access to the transcript merger: takes the channel A and
//! channel B transcript files (either may be missing or empty) and writes
//! the combined, source-tagged transcript.

use std::path::PathBuf;

use crate::transcript::merge;

/// Handles merging of two existing transcript files.
///
/// # Errors
/// - If an existing input file cannot be read
/// - If the combined file cannot be written
pub fn handle_merge(
    file_a: PathBuf,
    file_b: PathBuf,
    output: Option<String>,
) -> Result<(), anyhow::Error> {
    let combined_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("combined_transcript.txt"));

    let line_count = merge::merge_transcripts(&file_a, &file_b, &combined_path)?;

    println!(
        "Merged {line_count} lines into {}",
        combined_path.display()
    );

    Ok(())
}
