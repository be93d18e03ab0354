// Translation architecture
//
// Translation backends are created through a factory. The default
// implementation resolves the target language through the static model
// table and calls a hosted inference endpoint for that model.

pub mod marian;

use async_trait::async_trait;

use crate::config::TranslateConfig;
use crate::error::Result;

/// Main trait for translation operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate text into the target language named by its table key.
    ///
    /// An unknown language key fails before any model is contacted.
    async fn translate(&mut self, text: &str, target_language: &str) -> Result<String>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the default translator implementation
    pub fn create_translator(config: TranslateConfig) -> Box<dyn Translator> {
        Box::new(marian::MarianTranslator::new(config))
    }
}
