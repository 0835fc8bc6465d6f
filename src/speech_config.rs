//! # Speech Configuration Module
//!
//! Parameters sent to the speech API with every synthesis and transcription
//! request.

// Constants for speech API configuration
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TTS_MODEL: &str = "tts-1-hd";
pub const DEFAULT_TTS_FORMAT: &str = "opus";
pub const DEFAULT_STT_MODEL: &str = "whisper-1";
pub const STT_RESPONSE_FORMAT: &str = "text";

/// Phrase synthesised when a voice has no sample clip on disk
pub const SAMPLE_PHRASE: &str = "Hello! This is how I sound. Pick me if you like this voice.";

/// Configuration structure for speech API requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    /// API base URL without trailing slash (e.g. "https://api.openai.com/v1")
    pub api_base: String,
    /// Bearer token for the speech API
    pub api_key: String,
    /// Synthesis model
    pub tts_model: String,
    /// Audio format returned by synthesis ("opus" plays as a Telegram voice note)
    pub tts_format: String,
    /// Transcription model
    pub stt_model: String,
}

impl SpeechConfig {
    /// Default configuration for the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Full URL of an API endpoint such as "audio/speech"
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_format: DEFAULT_TTS_FORMAT.to_string(),
            stt_model: DEFAULT_STT_MODEL.to_string(),
        }
    }
}
