use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

use super::Translator;
use crate::config::TranslateConfig;
use crate::error::{DubError, Result};
use crate::languages;

/// Single translation candidate returned by the inference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub translation_text: String,
}

/// Translator backed by hosted opus-mt sequence-to-sequence models.
///
/// Each target language maps to its own pretrained model through the static
/// model table. Decoding parameters are never set, so the output is whatever
/// the serving library's default decoding strategy produces.
pub struct MarianTranslator {
    client: Client,
    config: TranslateConfig,
    /// Languages whose model has already answered once this process.
    ///
    /// The first request per language asks the server to wait for the model
    /// to load; later requests skip the wait.
    warmed: HashSet<String>,
}

impl MarianTranslator {
    pub fn new(config: TranslateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("HTTP client creation should not fail");

        Self {
            client,
            config,
            warmed: HashSet::new(),
        }
    }

    /// Remove special control tokens the model may leave in decoded output
    pub fn strip_control_tokens(text: &str) -> String {
        let mut cleaned = text.to_string();
        for token in ["<pad>", "</s>", "<s>", "<unk>"] {
            cleaned = cleaned.replace(token, "");
        }
        cleaned.trim().to_string()
    }
}

#[async_trait]
impl Translator for MarianTranslator {
    async fn translate(&mut self, text: &str, target_language: &str) -> Result<String> {
        let model = languages::translation_model(target_language)
            .ok_or_else(|| DubError::UnsupportedLanguage(target_language.to_string()))?;

        info!(
            "Translating to {} with model {}",
            target_language, model
        );

        let key = target_language.to_lowercase();
        let wait_for_model = !self.warmed.contains(&key);
        let url = format!("{}/models/{}", self.config.endpoint, model);

        let request = json!({
            "inputs": text,
            "options": { "wait_for_model": wait_for_model },
        });

        debug!("Sending translation request to: {}", url);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DubError::Translate(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DubError::Translate(format!(
                "Inference API error {}: {}",
                status, error_text
            )));
        }

        let candidates: Vec<TranslationOutput> = response
            .json()
            .await
            .map_err(|e| DubError::Translate(format!("Failed to parse response: {}", e)))?;

        let best = candidates
            .into_iter()
            .next()
            .ok_or_else(|| DubError::Translate("Empty translation received".to_string()))?;

        self.warmed.insert(key);

        let translation = Self::strip_control_tokens(&best.translation_text);
        if translation.is_empty() {
            return Err(DubError::Translate(
                "Translation contained no text".to_string(),
            ));
        }

        Ok(translation)
    }
}
