//! Process configuration read from the environment at startup.

use std::path::PathBuf;

use crate::access::AccessGuard;
use crate::errors::ConfigError;
use crate::speech_config::SpeechConfig;

pub const DEFAULT_SCRATCH_DIR: &str = "./voices";
pub const DEFAULT_SAMPLES_DIR: &str = "./samples";

/// Everything the bot needs to start
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub speech: SpeechConfig,
    pub access: AccessGuard,
    /// PostgreSQL URL; preferences stay in memory when unset
    pub database_url: Option<String>,
    /// Where downloaded voice messages are written
    pub scratch_dir: PathBuf,
    /// Where voice sample clips are read from and cached
    pub samples_dir: PathBuf,
    pub accept_documents: bool,
    pub keep_downloads: bool,
}

impl BotConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let telegram_token = required("TELEGRAM_BOT_TOKEN")?;
        let mut speech = SpeechConfig::with_api_key(required("OPENAI_API_KEY")?);
        if let Some(base) = get("OPENAI_BASE_URL") {
            speech.api_base = base;
        }
        if let Some(model) = get("TTS_MODEL") {
            speech.tts_model = model;
        }
        if let Some(format) = get("TTS_FORMAT") {
            speech.tts_format = format;
        }
        if let Some(model) = get("STT_MODEL") {
            speech.stt_model = model;
        }

        let access =
            AccessGuard::parse(&required("ALLOWED_USERS")?).map_err(|e| ConfigError::Invalid {
                name: "ALLOWED_USERS",
                reason: e.to_string(),
            })?;

        Ok(Self {
            telegram_token,
            speech,
            access,
            database_url: get("DATABASE_URL"),
            scratch_dir: get("SCRATCH_DIR")
                .unwrap_or_else(|| DEFAULT_SCRATCH_DIR.to_string())
                .into(),
            samples_dir: get("SAMPLES_DIR")
                .unwrap_or_else(|| DEFAULT_SAMPLES_DIR.to_string())
                .into(),
            accept_documents: parse_flag("ACCEPT_DOCUMENTS", get("ACCEPT_DOCUMENTS"), true)?,
            keep_downloads: parse_flag("KEEP_DOWNLOADS", get("KEEP_DOWNLOADS"), false)?,
        })
    }
}

fn parse_flag(
    name: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            name,
            reason: format!("'{other}' is not a boolean"),
        }),
    }
}
