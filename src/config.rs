use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DubError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub synthesis: SynthesisConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper binary
    pub binary_path: String,
    /// Whisper model tier (balance of accuracy and latency)
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Hosted inference endpoint serving the translation models
    pub endpoint: String,
    /// Optional bearer token for the inference endpoint
    pub api_token: Option<String>,
    /// HTTP timeout for translation requests (seconds)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Speech synthesis endpoint URL
    pub endpoint: String,
    /// Client identifier expected by the endpoint
    pub client: String,
    /// HTTP timeout for synthesis requests (seconds)
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Path to ffprobe binary
    pub probe_binary_path: String,
    /// Sample rate for extracted audio (whisper expects 16 kHz)
    pub extract_sample_rate: u32,
    /// Sample rate for the synthesized waveform
    pub synthesis_sample_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "small".to_string(),
            },
            translate: TranslateConfig {
                endpoint: "https://api-inference.huggingface.co".to_string(),
                api_token: None,
                timeout_secs: 300,
            },
            synthesis: SynthesisConfig {
                endpoint: "https://translate.google.com/translate_tts".to_string(),
                client: "tw-ob".to_string(),
                timeout_secs: 120,
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                probe_binary_path: "ffprobe".to_string(),
                extract_sample_rate: 16000,
                synthesis_sample_rate: 24000,
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DubError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DubError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DubError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DubError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
