// Media processing architecture
//
// This module abstracts the ffmpeg/ffprobe operations the pipeline needs:
// - Commands: command builders for the concrete invocations
// - Processor: the ffmpeg-backed implementation of the trait

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Main trait for media processing operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Whether the container exposes at least one audio stream
    async fn has_audio_stream(&self, video_path: &Path) -> Result<bool>;

    /// Demux and decode the audio track into a standalone waveform file
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Transcode compressed synthesized speech into the canonical waveform
    async fn transcode_to_wav(&self, compressed_path: &Path, wav_path: &Path) -> Result<()>;

    /// Container duration in seconds
    async fn probe_duration(&self, video_path: &Path) -> Result<f64>;

    /// Replace the video's audio track; the video duration governs the output
    async fn replace_audio(
        &self,
        video_path: &Path,
        audio_path: &Path,
        output_path: &Path,
        video_duration: f64,
    ) -> Result<()>;

    /// Check if the media processor binary is available
    fn check_availability(&self) -> Result<()>;

    /// Get media processor version information
    async fn version_info(&self) -> Result<String>;
}

/// Factory for creating media processor instances
pub struct MediaProcessorFactory;

impl MediaProcessorFactory {
    /// Create the default media processor implementation (ffmpeg-based)
    pub fn create_processor(config: MediaConfig) -> Box<dyn MediaProcessor> {
        Box::new(processor::FfmpegProcessor::new(config))
    }
}
