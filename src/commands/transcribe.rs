//! Transcribe a pre-recorded audio file as one channel.
//!
//! Runs the transcription invoker on an existing encoded file: the engine
//! returns timestamped segments and the per-channel transcript file is
//! written next to the input (or to the given output path). Useful for
//! testing a single device's recording without a full dual session.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::anyhow;

use crate::channel::ChannelId;
use crate::config::TandemConfig;
use crate::transcript::writer;
use crate::transcription::{self, TranscriptionConfig, TranscriptionModel};

/// Handles transcription of an existing audio file.
///
/// # Errors
/// - If the input file does not exist
/// - If the channel selector or configured model is invalid
/// - If the engine call or transcript write fails
pub async fn handle_transcribe(
    file: PathBuf,
    channel: String,
    output: Option<String>,
) -> Result<(), anyhow::Error> {
    let channel = ChannelId::from_id(&channel)
        .ok_or_else(|| anyhow!("Channel must be 'a' or 'b', got '{channel}'"))?;

    if !file.exists() {
        return Err(anyhow!("Audio file not found: {}", file.display()));
    }

    let config = TandemConfig::load()?;
    let model = TranscriptionModel::from_id(&config.transcription.model).ok_or_else(|| {
        anyhow!(
            "Unknown transcription model '{}'. Available models: {}",
            config.transcription.model,
            TranscriptionModel::available_ids().join(", ")
        )
    })?;
    let transcription_config =
        TranscriptionConfig::new(model, config.transcription.api_key.clone());

    let output_path = match output {
        Some(path) => PathBuf::from(path),
        None => {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| channel.file_stem().to_string());
            file.with_file_name(format!("{stem}_transcript.txt"))
        }
    };

    println!("Transcribing {} as {channel}...", file.display());

    let started = Instant::now();
    let segments = transcription::transcribe(&transcription_config, &file).await?;
    writer::write_transcript(&segments, started.elapsed(), &output_path)?;

    println!(
        "{channel}: {} segments written to {}",
        segments.len(),
        output_path.display()
    );

    Ok(())
}
