use thiserror::Error;

#[derive(Error, Debug)]
pub enum DubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The video does not contain any audio track")]
    NoAudioTrack,

    #[error("Translation model not available for language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Transcription error: {0}")]
    Transcribe(String),

    #[error("Translation error: {0}")]
    Translate(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, DubError>;
