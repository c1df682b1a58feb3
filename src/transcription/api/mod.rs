//! Transcription API client with provider-specific implementations.
//!
//! This module provides the unified entry point for sending one encoded
//! audio file to a transcription provider and getting back the ordered,
//! timestamped segments. The caller doesn't need to know which provider is
//! being used; routing happens on the configured model.

mod groq;
mod openai;

use std::path::Path;

use serde::Deserialize;

use super::model::TranscriptionModel;

/// Configuration for transcription requests
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// The model to use
    pub model: TranscriptionModel,
    /// The API key for authentication
    pub api_key: String,
}

impl TranscriptionConfig {
    /// Creates a new transcription configuration
    pub fn new(model: TranscriptionModel, api_key: String) -> Self {
        Self { model, api_key }
    }
}

/// One timestamped span of recognized speech, as returned by the engine.
/// Offsets are seconds from the start of the audio file, not wall-clock
/// time.
#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    /// Recognized text (not yet trimmed)
    pub text: String,
}

/// Transcribes an audio file using the configured transcription model.
///
/// Returns the engine's segments in order. The engine call is treated as a
/// pure function of the audio file: no retries beyond the HTTP layer, no
/// cancellation once in flight.
///
/// # Errors
/// - If the audio file cannot be read from disk
/// - If no API key is configured and the provider's environment variable is unset
/// - If the API request fails due to network issues (connection, timeout)
/// - If the API returns an HTTP error (401 for invalid key, 429 for rate limit, etc.)
/// - If the API response cannot be parsed
pub async fn transcribe(
    config: &TranscriptionConfig,
    audio_path: &Path,
) -> anyhow::Result<Vec<Segment>> {
    tracing::info!(
        "Transcribing {} with {} ({})",
        audio_path.display(),
        config.model.provider().name(),
        config.model.id()
    );

    let segments = match config.model.provider() {
        super::provider::TranscriptionProvider::OpenAI => {
            openai::transcribe(config, audio_path).await
        }
        super::provider::TranscriptionProvider::Groq => {
            groq::transcribe(config, audio_path).await
        }
    }?;

    tracing::info!(
        "Engine returned {} segments for {}",
        segments.len(),
        audio_path.display()
    );

    Ok(segments)
}

/// Resolves the effective API key: the configured one, or the provider's
/// conventional environment variable.
pub(crate) fn resolve_api_key(config: &TranscriptionConfig) -> anyhow::Result<String> {
    if !config.api_key.trim().is_empty() {
        return Ok(config.api_key.clone());
    }

    let provider = config.model.provider();
    let env_var = provider.api_key_env_var();
    std::env::var(env_var).ok().filter(|k| !k.is_empty()).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key found for provider '{}'. Set `api_key` under [transcription] in the config file or export {env_var}.",
            provider.id()
        )
    })
}

/// Shared response shape for OpenAI-compatible `verbose_json` replies.
#[derive(Debug, Deserialize)]
pub(crate) struct VerboseJsonResponse {
    #[serde(default)]
    pub segments: Vec<Segment>,
}
