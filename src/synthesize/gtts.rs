use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use super::SpeechSynthesizer;
use crate::config::SynthesisConfig;
use crate::error::{DubError, Result};

/// The TTS endpoint rejects requests longer than this many characters.
const MAX_CHUNK_CHARS: usize = 100;

/// Synthesizer backed by the Google Translate TTS endpoint.
///
/// Long text is split into chunks the endpoint accepts; the returned MPEG
/// frames are appended into a single compressed file.
pub struct GoogleTtsSynthesizer {
    client: Client,
    config: SynthesisConfig,
}

impl GoogleTtsSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self { client, config }
    }

    /// Split text into whitespace-delimited chunks of at most `max_chars`
    /// characters. A single token longer than the limit becomes its own
    /// chunk rather than being dropped.
    pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
            } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
                current.push(' ');
                current.push_str(word);
            } else {
                chunks.push(std::mem::take(&mut current));
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        voice_code: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>> {
        debug!("Fetching TTS chunk {}/{}", idx + 1, total);

        let idx_param = idx.to_string();
        let total_param = total.to_string();
        let textlen_param = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", voice_code),
                ("client", self.config.client.as_str()),
                ("idx", idx_param.as_str()),
                ("total", total_param.as_str()),
                ("textlen", textlen_param.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DubError::Synthesis(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(DubError::Synthesis(format!(
                "TTS endpoint error {} for chunk {}/{}",
                response.status(),
                idx + 1,
                total
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DubError::Synthesis(format!("Failed to read TTS response: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTtsSynthesizer {
    async fn synthesize(&self, text: &str, voice_code: &str, output_path: &Path) -> Result<()> {
        let chunks = Self::chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(DubError::Synthesis(
                "No text to synthesize".to_string(),
            ));
        }

        info!(
            "Synthesizing {} character(s) of '{}' speech in {} chunk(s)",
            text.chars().count(),
            voice_code,
            chunks.len()
        );

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, voice_code, idx, total).await?;
            audio.extend_from_slice(&bytes);
        }

        tokio::fs::write(output_path, &audio)
            .await
            .map_err(|e| DubError::Synthesis(format!("Failed to write audio file: {}", e)))?;

        info!("Synthesized speech written to {}", output_path.display());
        Ok(())
    }
}
