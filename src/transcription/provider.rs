//! Transcription provider definitions and methods.
//!
//! Defines supported transcription service providers. Each provider has its
//! own API endpoint, authentication method, and API-key environment
//! variable fallback.

use serde::{Deserialize, Serialize};

/// Represents a supported transcription provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TranscriptionProvider {
    OpenAI,
    Groq,
}

impl TranscriptionProvider {
    pub fn id(&self) -> &'static str {
        match self {
            TranscriptionProvider::OpenAI => "openai",
            TranscriptionProvider::Groq => "groq",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TranscriptionProvider::OpenAI => "OpenAI",
            TranscriptionProvider::Groq => "Groq",
        }
    }

    /// Environment variable consulted when no API key is configured.
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            TranscriptionProvider::OpenAI => "OPENAI_API_KEY",
            TranscriptionProvider::Groq => "GROQ_API_KEY",
        }
    }

}
