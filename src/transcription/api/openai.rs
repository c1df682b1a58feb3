//! OpenAI Whisper API implementation.
//!
//! Handles transcription requests to OpenAI's Whisper API using multipart
//! form data with `response_format=verbose_json`, which carries the
//! per-segment start/end offsets the merge stage needs.

use std::path::Path;

use super::{resolve_api_key, Segment, TranscriptionConfig, VerboseJsonResponse};

/// Transcribes an audio file using OpenAI's Whisper API.
///
/// Uses multipart form data with bearer token authentication.
pub async fn transcribe(
    config: &TranscriptionConfig,
    audio_path: &Path,
) -> anyhow::Result<Vec<Segment>> {
    let api_key = resolve_api_key(config)?;

    let audio_data = std::fs::read(audio_path)
        .map_err(|e| anyhow::anyhow!("Failed to read audio file: {e}"))?;

    let client = reqwest::Client::new();

    let file_name = audio_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let file_part = reqwest::multipart::Part::bytes(audio_data)
        .file_name(file_name)
        .mime_str("audio/wav")
        .map_err(|e| anyhow::anyhow!("Failed to create file part for upload: {e}"))?;

    let form = reqwest::multipart::Form::new()
        .part("file", file_part)
        .text("model", config.model.api_model_name().to_string())
        .text("response_format", "verbose_json".to_string())
        .text("timestamp_granularities[]", "segment".to_string());

    let url = config.model.endpoint();

    tracing::debug!(
        "OpenAI API call: POST {} (model={}, response_format=verbose_json)",
        url,
        config.model.api_model_name()
    );

    let response = match client
        .post(url)
        .bearer_auth(&api_key)
        .multipart(form)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            let error_msg = if e.is_connect() {
                "Failed to connect to OpenAI API server. Check your internet connection.".to_string()
            } else if e.is_timeout() {
                "Request to OpenAI timed out. The API server is not responding.".to_string()
            } else {
                format!("OpenAI network error: {e}")
            };
            return Err(anyhow::anyhow!(error_msg));
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let human_readable = match status.as_u16() {
            401 => "OpenAI API key is invalid or expired. Update the key in your config or OPENAI_API_KEY.".to_string(),
            403 => "You don't have permission to use OpenAI's API. Check your API key and account status.".to_string(),
            429 => "Too many requests to OpenAI. You've hit the API rate limit. Please wait and try again.".to_string(),
            500 | 502 | 503 | 504 => "OpenAI API server is experiencing issues. Please try again later.".to_string(),
            _ => format!("OpenAI API error (status {status}): {error_body}"),
        };

        return Err(anyhow::anyhow!(human_readable));
    }

    let transcription: VerboseJsonResponse = response
        .json()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to parse OpenAI response: {e}"))?;

    Ok(transcription.segments)
}
