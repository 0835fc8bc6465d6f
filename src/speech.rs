//! # Speech API Adapters
//!
//! Text-to-speech and speech-to-text behind two small traits so the bot
//! handlers can be exercised with fakes. `OpenAiSpeechClient` implements both
//! against the OpenAI-compatible `audio/speech` and `audio/transcriptions`
//! endpoints.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::SpeechError;
use crate::speech_config::{SpeechConfig, STT_RESPONSE_FORMAT};
use crate::voice::Voice;

/// Turns text into audio
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with `voice` and return the encoded audio
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError>;
}

/// Turns recorded audio into text
#[async_trait]
pub trait SpeechTranscriber: Send + Sync {
    /// Transcribe the audio file at `path`
    async fn transcribe(&self, path: &Path) -> Result<String, SpeechError>;
}

/// JSON body of a synthesis request
#[derive(Debug, Serialize)]
pub struct SpeechRequest<'a> {
    pub model: &'a str,
    pub input: &'a str,
    pub voice: Voice,
    pub response_format: &'a str,
}

#[derive(Debug, Clone)]
pub struct OpenAiSpeechClient {
    http: reqwest::Client,
    config: SpeechConfig,
}

impl OpenAiSpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: SpeechConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }
}

/// Fail with the response body when the API did not answer with success
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SpeechError::Api { status, body })
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechClient {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError> {
        debug!(chars = text.len(), voice = %voice, "Requesting speech synthesis");

        let request = SpeechRequest {
            model: &self.config.tts_model,
            input: text,
            voice,
            response_format: &self.config.tts_format,
        };

        let response = self
            .http
            .post(self.config.endpoint("audio/speech"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;
        let audio = check_status(response).await?.bytes().await?;

        info!(bytes = audio.len(), voice = %voice, "Speech synthesis completed");
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechTranscriber for OpenAiSpeechClient {
    async fn transcribe(&self, path: &Path) -> Result<String, SpeechError> {
        let audio = tokio::fs::read(path).await?;
        debug!(bytes = audio.len(), path = %path.display(), "Requesting transcription");

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "voice.ogg".to_string());
        let part = reqwest::multipart::Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/ogg")?;
        let form = reqwest::multipart::Form::new()
            .text("model", self.config.stt_model.clone())
            .text("response_format", STT_RESPONSE_FORMAT)
            .part("file", part);

        let response = self
            .http
            .post(self.config.endpoint("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let text = check_status(response).await?.text().await?;

        let text = text.trim().to_string();
        info!(chars = text.len(), "Transcription completed");
        Ok(text)
    }
}
