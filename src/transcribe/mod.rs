// Transcription architecture
//
// Different speech-recognition backends are created through a factory.
// The default implementation shells out to the whisper CLI; adding a new
// backend means implementing Transcriber and extending the factory.

pub mod whisper_cli;

use async_trait::async_trait;
use std::path::Path;

use crate::config::TranscriberConfig;
use crate::error::Result;

/// Transcript produced by a speech-recognition backend
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Plain-text transcript in the spoken language
    pub text: String,
    /// Language detected by the model, when reported
    pub language: Option<String>,
}

/// Main trait for transcription operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a waveform audio file to text.
    ///
    /// No source-language hint is supplied; the model detects the spoken
    /// language itself.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;
}

/// Transcriber implementation type
#[derive(Debug, Clone)]
pub enum TranscriberImplementation {
    WhisperCli,
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create a transcriber based on implementation type
    pub fn create_transcriber(
        implementation: TranscriberImplementation,
        config: TranscriberConfig,
    ) -> Box<dyn Transcriber> {
        match implementation {
            TranscriberImplementation::WhisperCli => {
                Box::new(whisper_cli::WhisperCliTranscriber::new(config))
            }
        }
    }

    /// Create with the default implementation
    pub fn create_default(config: TranscriberConfig) -> Box<dyn Transcriber> {
        Self::create_transcriber(TranscriberImplementation::WhisperCli, config)
    }
}
