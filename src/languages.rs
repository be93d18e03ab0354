//! Static language lookup tables.
//!
//! Two fixed tables drive language selection: one maps a language name to the
//! pretrained translation model serving that English-to-target pair, the
//! other maps a language name to the voice code understood by the speech
//! synthesis endpoint. The CLI only offers languages present in the voice
//! table, so the translation table is always a superset of what users can
//! pick.

/// Language name -> translation model identifier (English source).
pub const TRANSLATION_MODELS: &[(&str, &str)] = &[
    ("french", "Helsinki-NLP/opus-mt-en-fr"),
    ("spanish", "Helsinki-NLP/opus-mt-en-es"),
    ("german", "Helsinki-NLP/opus-mt-en-de"),
    ("italian", "Helsinki-NLP/opus-mt-en-it"),
    ("russian", "Helsinki-NLP/opus-mt-en-ru"),
    ("chinese", "Helsinki-NLP/opus-mt-en-zh"),
    ("japanese", "Helsinki-NLP/opus-mt-en-ja"),
    ("portuguese", "Helsinki-NLP/opus-mt-en-pt"),
    ("arabic", "Helsinki-NLP/opus-mt-en-ar"),
    ("korean", "Helsinki-NLP/opus-mt-tc-big-en-ko"),
    ("hindi", "Helsinki-NLP/opus-mt-en-hi"),
];

/// Language name -> two-letter voice code for speech synthesis.
pub const VOICE_CODES: &[(&str, &str)] = &[
    ("french", "fr"),
    ("spanish", "es"),
    ("italian", "it"),
    ("portuguese", "pt"),
    ("russian", "ru"),
    ("chinese", "zh"),
    ("japanese", "ja"),
    ("arabic", "ar"),
    ("korean", "ko"),
    ("hindi", "hi"),
];

/// Look up the translation model identifier for a language name.
pub fn translation_model(language: &str) -> Option<&'static str> {
    let key = language.to_lowercase();
    TRANSLATION_MODELS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, model)| *model)
}

/// Look up the speech synthesis voice code for a language name.
pub fn voice_code(language: &str) -> Option<&'static str> {
    let key = language.to_lowercase();
    VOICE_CODES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
}

/// Languages offered to the user: only those with a synthesis voice.
pub fn offered_languages() -> impl Iterator<Item = &'static str> {
    VOICE_CODES.iter().map(|(name, _)| *name)
}
