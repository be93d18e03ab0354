// Speech synthesis architecture
//
// Synthesis backends are created through a factory. The default
// implementation calls a Google-Translate-style TTS endpoint and writes
// compressed MPEG audio; the pipeline transcodes that to the canonical
// waveform through the media module.

pub mod gtts;

use async_trait::async_trait;
use std::path::Path;

use crate::config::SynthesisConfig;
use crate::error::Result;

/// Main trait for speech synthesis operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize speech for `text` in the given voice, writing compressed
    /// audio to `output_path`.
    async fn synthesize(&self, text: &str, voice_code: &str, output_path: &Path) -> Result<()>;
}

/// Factory for creating synthesizer instances
pub struct SynthesizerFactory;

impl SynthesizerFactory {
    /// Create the default synthesizer implementation
    pub fn create_synthesizer(config: SynthesisConfig) -> Box<dyn SpeechSynthesizer> {
        Box::new(gtts::GoogleTtsSynthesizer::new(config))
    }
}
