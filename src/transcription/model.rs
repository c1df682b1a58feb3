//! Transcription model definitions and metadata.
//!
//! Defines the supported transcription models with their providers, API
//! endpoints, and API model names. Only models that return per-segment
//! timestamps are listed; the merge stage depends on them.

use serde::{Deserialize, Serialize};

use super::provider::TranscriptionProvider;

/// Represents a supported transcription model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranscriptionModel {
    /// Groq-hosted Whisper large v3 turbo (fast, default)
    WhisperLargeV3Turbo,
    /// Groq-hosted Whisper large v3 (slower, highest accuracy)
    WhisperLargeV3,
    /// OpenAI Whisper (the only OpenAI model with segment timestamps)
    Whisper,
}

impl TranscriptionModel {
    /// Returns the provider for this model
    pub fn provider(&self) -> TranscriptionProvider {
        match self {
            TranscriptionModel::WhisperLargeV3Turbo | TranscriptionModel::WhisperLargeV3 => {
                TranscriptionProvider::Groq
            }
            TranscriptionModel::Whisper => TranscriptionProvider::OpenAI,
        }
    }

    /// Returns the model identifier as a string
    pub fn id(&self) -> &'static str {
        match self {
            TranscriptionModel::WhisperLargeV3Turbo => "whisper-large-v3-turbo",
            TranscriptionModel::WhisperLargeV3 => "whisper-large-v3",
            TranscriptionModel::Whisper => "whisper",
        }
    }

    /// Returns the API endpoint for this model
    pub fn endpoint(&self) -> &'static str {
        match self {
            TranscriptionModel::WhisperLargeV3Turbo | TranscriptionModel::WhisperLargeV3 => {
                "https://api.groq.com/openai/v1/audio/transcriptions"
            }
            TranscriptionModel::Whisper => "https://api.openai.com/v1/audio/transcriptions",
        }
    }

    /// Returns the model name to send to the API
    pub fn api_model_name(&self) -> &'static str {
        match self {
            TranscriptionModel::WhisperLargeV3Turbo => "whisper-large-v3-turbo",
            TranscriptionModel::WhisperLargeV3 => "whisper-large-v3",
            TranscriptionModel::Whisper => "whisper-1",
        }
    }

    /// Parses a model ID string into a TranscriptionModel
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "whisper-large-v3-turbo" => Some(TranscriptionModel::WhisperLargeV3Turbo),
            "whisper-large-v3" => Some(TranscriptionModel::WhisperLargeV3),
            "whisper" => Some(TranscriptionModel::Whisper),
            _ => None,
        }
    }

    /// Returns all available models
    pub fn all() -> &'static [Self] {
        &[
            TranscriptionModel::WhisperLargeV3Turbo,
            TranscriptionModel::WhisperLargeV3,
            TranscriptionModel::Whisper,
        ]
    }

    /// Returns all available model IDs
    pub fn available_ids() -> Vec<&'static str> {
        Self::all().iter().map(|m| m.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for model in TranscriptionModel::all() {
            assert_eq!(TranscriptionModel::from_id(model.id()).as_ref(), Some(model));
        }
        assert_eq!(TranscriptionModel::from_id("nonsense"), None);
    }
}
