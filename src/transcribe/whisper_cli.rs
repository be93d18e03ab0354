use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::info;

use super::{Transcriber, Transcript};
use crate::config::TranscriberConfig;
use crate::error::{DubError, Result};

/// Whisper CLI JSON output format (segments are ignored; the pipeline only
/// consumes the joined text)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    pub text: String,
    pub language: Option<String>,
}

/// Transcriber backed by the whisper command-line tool
pub struct WhisperCliTranscriber {
    config: TranscriberConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    fn parse_output(json_content: &str) -> Result<Transcript> {
        let output: WhisperOutput = serde_json::from_str(json_content)
            .map_err(|e| DubError::Transcribe(format!("Failed to parse whisper JSON: {}", e)))?;

        Ok(Transcript {
            text: output.text.trim().to_string(),
            language: output.language,
        })
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        info!(
            "Transcribing {} with whisper model '{}'",
            audio_path.display(),
            self.config.model
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| DubError::Transcribe(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--task")
            .arg("transcribe")
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json");

        let output = cmd
            .output()
            .map_err(|e| DubError::Transcribe(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DubError::Transcribe(format!("Whisper failed: {}", stderr)));
        }

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| DubError::Transcribe("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = std::fs::read_to_string(&json_file)
            .map_err(|e| DubError::Transcribe(format!("Failed to read whisper output: {}", e)))?;

        let transcript = Self::parse_output(&json_content)?;
        if let Some(language) = &transcript.language {
            info!("Whisper detected language: {}", language);
        }

        Ok(transcript)
    }
}
