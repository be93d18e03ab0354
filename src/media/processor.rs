use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use super::{MediaCommandBuilder, MediaProcessor};
use crate::config::MediaConfig;
use crate::error::{DubError, Result};

/// Concrete ffmpeg/ffprobe-backed media processor
pub struct FfmpegProcessor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegProcessor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder =
            MediaCommandBuilder::new(&config.binary_path, &config.probe_binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn has_audio_stream(&self, video_path: &Path) -> Result<bool> {
        debug!("Probing audio streams in {}", video_path.display());

        let command = self.command_builder.probe_audio_streams(video_path);
        let stdout = command.execute_with_output().await?;

        Ok(!stdout.trim().is_empty())
    }

    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!(
            "Extracting audio from {} to {}",
            video_path.display(),
            audio_path.display()
        );

        let command = self.command_builder.extract_audio(
            video_path,
            audio_path,
            self.config.extract_sample_rate,
        );
        command.execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    async fn transcode_to_wav(&self, compressed_path: &Path, wav_path: &Path) -> Result<()> {
        info!(
            "Transcoding {} to {}",
            compressed_path.display(),
            wav_path.display()
        );

        let command = self.command_builder.transcode_to_wav(
            compressed_path,
            wav_path,
            self.config.synthesis_sample_rate,
        );
        command.execute().await
    }

    async fn probe_duration(&self, video_path: &Path) -> Result<f64> {
        let command = self.command_builder.probe_duration(video_path);
        let stdout = command.execute_with_output().await?;

        stdout
            .trim()
            .parse::<f64>()
            .map_err(|e| DubError::Media(format!("Failed to parse container duration: {}", e)))
    }

    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
        video_duration: f64,
    ) -> Result<()> {
        info!(
            "Replacing audio in {} with {} -> {}",
            video_path.display(),
            audio_path.display(),
            output_path.display()
        );

        let command = self.command_builder.replace_audio(
            video_path,
            audio_path,
            output_path,
            video_duration,
        );
        command.execute().await?;

        info!("Audio replacement completed");
        Ok(())
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| DubError::Media(format!("Media processor not found: {}", e)))?;

        if output.status.success() {
            info!("Media processor is available");
            Ok(())
        } else {
            Err(DubError::Media(
                "Media processor version check failed".to_string(),
            ))
        }
    }

    async fn version_info(&self) -> Result<String> {
        debug!("Getting media processor version information");

        let command = self.command_builder.version_check();
        let stdout = command.execute_with_output().await?;

        let first_line = stdout.lines().next().unwrap_or("Unknown version");
        Ok(first_line.to_string())
    }
}
