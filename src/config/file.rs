//! Configuration file management for tandem.
//!
//! The config file persists what the core treats as collaborator input:
//! the save folder, the two channel device selectors, capture parameters,
//! and the transcription model/key. Stored as TOML in the user's config
//! directory.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Channel A input device. Options:
    /// - "default" for the system default device
    /// - numeric index (0, 1, 2, etc.) from `tandem list-devices`
    /// - device name from `tandem list-devices`
    #[serde(default = "default_device")]
    pub channel_a_device: String,
    /// Channel B input device, typically a loopback/"stereo mix" source.
    /// Same selector options as channel A. Must be set before recording.
    #[serde(default)]
    pub channel_b_device: String,
    /// Samples per capture block requested from the device
    #[serde(default = "default_block_size")]
    pub block_size: u32,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_block_size() -> u32 {
    1024
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            channel_a_device: default_device(),
            channel_b_device: String::new(),
            block_size: default_block_size(),
        }
    }
}

/// Output location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder that receives one timestamped subfolder per session
    #[serde(default = "default_save_folder")]
    pub save_folder: String,
}

fn default_save_folder() -> String {
    dirs::home_dir()
        .map(|home| home.join("recordings").to_string_lossy().to_string())
        .unwrap_or_else(|| "recordings".to_string())
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_folder: default_save_folder(),
        }
    }
}

/// Transcription engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Model ID, see `TranscriptionModel::available_ids()`
    #[serde(default = "default_model")]
    pub model: String,
    /// API key for the model's provider. Empty means the provider's
    /// environment variable (e.g. GROQ_API_KEY) is used instead.
    #[serde(default)]
    pub api_key: String,
}

fn default_model() -> String {
    "whisper-large-v3-turbo".to_string()
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TandemConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
}

impl TandemConfig {
    /// Loads configuration from the user's config directory, writing a
    /// default file first if none exists.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if !path.exists() {
            let config = TandemConfig::default();
            config.save()?;
            tracing::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config: TandemConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves configuration to the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the file cannot be written
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::info!("Configuration saved");
        Ok(())
    }
}

/// Retrieves the path to the config file, creating the directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("tandem");

    fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("tandem.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = TandemConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: TandemConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.audio.channel_a_device, "default");
        assert_eq!(parsed.audio.channel_b_device, "");
        assert_eq!(parsed.audio.block_size, 1024);
        assert_eq!(parsed.transcription.model, "whisper-large-v3-turbo");
    }

    #[test]
    fn missing_fields_take_serde_defaults() {
        let parsed: TandemConfig = toml::from_str(
            r#"
            [audio]
            channel_b_device = "3"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.audio.channel_a_device, "default");
        assert_eq!(parsed.audio.channel_b_device, "3");
        assert_eq!(parsed.audio.block_size, 1024);
        assert!(parsed.transcription.api_key.is_empty());
    }
}
