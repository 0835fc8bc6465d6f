//! # Error Types Module
//!
//! Structured errors for the services the bot talks to. Handlers turn these
//! into fixed user-facing replies; the variants only carry enough detail for
//! the logs.

use thiserror::Error;

/// Errors raised while reading the process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("missing required variable {0}")]
    Missing(&'static str),
    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Errors raised while parsing user-supplied values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An allow-list entry is not an integer
    #[error("'{0}' is not a user id")]
    InvalidUserId(String),
    /// A name that is not one of the offered voices
    #[error("unknown voice '{0}'")]
    UnknownVoice(String),
}

/// Errors raised while downloading a Telegram file
#[derive(Debug, Error)]
pub enum FetchError {
    /// `getFile` failed
    #[error("file metadata lookup failed: {0}")]
    Metadata(#[from] teloxide::RequestError),
    /// Transport error while downloading
    #[error("download request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Download answered with a non-success status
    #[error("download returned status {0}")]
    Status(reqwest::StatusCode),
    /// Download answered with an empty body
    #[error("download returned an empty body")]
    EmptyBody,
    /// Writing the downloaded file failed
    #[error("could not store downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the speech API adapters
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Transport error talking to the speech API
    #[error("speech API request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Speech API answered with a non-success status
    #[error("speech API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Reading the audio file to upload failed
    #[error("could not read audio file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the voice preference store
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Database error
    #[error("preference storage failed: {0}")]
    Database(#[from] sqlx::Error),
}
