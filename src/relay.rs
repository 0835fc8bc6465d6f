//! # Relay Module
//!
//! Request logic behind every handler: which external service is called for
//! an event and what the chat gets back. Nothing in here talks to Telegram
//! directly; the bot handlers turn a [`Reply`] into the actual API calls.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::access::AccessGuard;
use crate::errors::PreferenceError;
use crate::media::MediaFetcher;
use crate::preferences::PreferenceStore;
use crate::speech::{SpeechSynthesizer, SpeechTranscriber};
use crate::speech_config::SAMPLE_PHRASE;
use crate::voice::Voice;

/// The only document type read aloud
pub const PLAIN_TEXT_MIME: &str = "text/plain";

/// Feature switches and paths shared by all handlers
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub accept_documents: bool,
    pub keep_downloads: bool,
    pub samples_dir: PathBuf,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            accept_documents: true,
            keep_downloads: false,
            samples_dir: PathBuf::from(crate::config::DEFAULT_SAMPLES_DIR),
        }
    }
}

/// Service handles injected into every handler
#[derive(Clone)]
pub struct Services {
    pub access: Arc<AccessGuard>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub transcriber: Arc<dyn SpeechTranscriber>,
    pub fetcher: Arc<dyn MediaFetcher>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub settings: Arc<RelaySettings>,
}

/// Fixed user-facing messages, one per failure kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    DownloadFailed,
    TranscriptionFailed,
    TranscriptionEmpty,
    UnsupportedDocument,
    EmptyDocument,
    StorageFailed,
}

impl Notice {
    /// Localization key of the message
    pub fn key(self) -> &'static str {
        match self {
            Notice::DownloadFailed => "error-download-failed",
            Notice::TranscriptionFailed => "error-transcription-failed",
            Notice::TranscriptionEmpty => "transcription-empty",
            Notice::UnsupportedDocument => "error-unsupported-document",
            Notice::EmptyDocument => "error-empty-document",
            Notice::StorageFailed => "error-storage-failed",
        }
    }
}

/// What to send back for an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Voice message replying to the original message
    Voice(Vec<u8>),
    /// Text replying to the original message
    Text(String),
    /// Fixed message from the localization files
    Notice(Notice),
    /// Nothing is sent
    Silent,
}

impl Services {
    /// Voice to use for a user; storage failures fall back to the default
    pub async fn voice_for(&self, user_id: i64) -> Voice {
        match self.preferences.read_voice(user_id).await {
            Ok(voice) => voice,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read voice preference, using default");
                Voice::default()
            }
        }
    }

    /// Read free-form text aloud with the user's voice
    ///
    /// Synthesis failures are logged and the event is dropped without a reply.
    pub async fn speak(&self, user_id: i64, text: &str) -> Reply {
        let voice = self.voice_for(user_id).await;
        match self.synthesizer.synthesize(text, voice).await {
            Ok(audio) => {
                info!(user_id, voice = %voice, bytes = audio.len(), "Text synthesized");
                Reply::Voice(audio)
            }
            Err(e) => {
                error!(user_id, voice = %voice, error = %e, "Speech synthesis failed");
                Reply::Silent
            }
        }
    }

    /// Download a voice message and transcribe it
    pub async fn transcribe_voice(&self, user_id: i64, file_id: &str) -> Reply {
        let path = match self.fetcher.fetch_to_file(file_id).await {
            Ok(path) => path,
            Err(e) => {
                error!(user_id, file_id, error = %e, "Failed to download voice message");
                return Reply::Notice(Notice::DownloadFailed);
            }
        };

        let result = self.transcriber.transcribe(&path).await;

        if !self.settings.keep_downloads {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Downloaded voice file removed"),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Failed to remove downloaded voice file")
                }
            }
        }

        match result {
            Ok(text) if text.trim().is_empty() => {
                info!(user_id, "Transcription returned no text");
                Reply::Notice(Notice::TranscriptionEmpty)
            }
            Ok(text) => {
                info!(user_id, chars = text.len(), "Voice message transcribed");
                Reply::Text(text)
            }
            Err(e) => {
                error!(user_id, error = %e, "Transcription failed");
                Reply::Notice(Notice::TranscriptionFailed)
            }
        }
    }

    /// Read an uploaded document aloud if it is plain text
    pub async fn speak_document(
        &self,
        user_id: i64,
        mime_type: Option<&str>,
        file_id: &str,
    ) -> Reply {
        if !is_plain_text(mime_type) {
            debug!(user_id, mime_type = ?mime_type, "Rejected non plain text document");
            return Reply::Notice(Notice::UnsupportedDocument);
        }

        let bytes = match self.fetcher.fetch_bytes(file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(user_id, file_id, error = %e, "Failed to download document");
                return Reply::Notice(Notice::DownloadFailed);
            }
        };

        let text = document_text(&bytes);
        if text.is_empty() {
            return Reply::Notice(Notice::EmptyDocument);
        }
        // Documents over the synthesis input limit fail like any other synthesis error
        self.speak(user_id, &text).await
    }

    /// Persist the voice chosen in the picker
    pub async fn select_voice(&self, user_id: i64, voice: Voice) -> Result<(), PreferenceError> {
        self.preferences.set_voice(user_id, voice).await?;
        info!(user_id, voice = %voice, "Voice preference updated");
        Ok(())
    }

    /// Path of a voice's sample clip, synthesising and caching it when missing
    pub async fn sample_clip(&self, voice: Voice) -> anyhow::Result<PathBuf> {
        let path = self
            .settings
            .samples_dir
            .join(format!("{}.ogg", voice.as_str()));
        if tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }

        info!(voice = %voice, path = %path.display(), "Sample clip missing, synthesising it");
        let audio = self.synthesizer.synthesize(SAMPLE_PHRASE, voice).await?;

        let dir = self.settings.samples_dir.clone();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            std::fs::create_dir_all(&dir)?;
            let mut temp_file = NamedTempFile::new_in(&dir)?;
            std::io::Write::write_all(temp_file.as_file_mut(), &audio)?;
            temp_file.persist(&target)?;
            Ok(())
        })
        .await??;

        Ok(path)
    }
}

/// Decode an uploaded text file, dropping a leading byte order mark
pub fn document_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_start_matches('\u{feff}').trim().to_string()
}

/// Whether a document MIME type is accepted for reading aloud
pub fn is_plain_text(mime_type: Option<&str>) -> bool {
    mime_type
        .and_then(|mime| mime.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PLAIN_TEXT_MIME))
}
