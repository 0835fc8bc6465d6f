//! Media Fetcher: downloads Telegram files referenced by file id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::errors::FetchError;

#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download a file into the scratch directory and return its path
    async fn fetch_to_file(&self, file_id: &str) -> Result<PathBuf, FetchError>;

    /// Download a file into memory
    async fn fetch_bytes(&self, file_id: &str) -> Result<Vec<u8>, FetchError>;
}

/// Local file name for a downloaded voice message: `<file id>-<6 hex>.ogg`
pub fn scratch_file_name(file_id: &str) -> String {
    let safe_id: String = file_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let token: u32 = rand::thread_rng().gen_range(0..0x0100_0000);
    format!("{safe_id}-{token:06x}.ogg")
}

#[derive(Clone)]
pub struct TelegramMediaFetcher {
    bot: Bot,
    http: reqwest::Client,
    scratch_dir: PathBuf,
}

impl TelegramMediaFetcher {
    pub fn new(bot: Bot, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            bot,
            http: reqwest::Client::new(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Resolve the file id and start the download
    async fn open(&self, file_id: &str) -> Result<reqwest::Response, FetchError> {
        let file = self.bot.get_file(FileId(file_id.to_owned())).await?;
        let url = format!(
            "{}/file/bot{}/{}",
            self.bot.api_url().as_str().trim_end_matches('/'),
            self.bot.token(),
            file.path
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response)
    }
}

/// Write a response body to `path` chunk by chunk, returning the byte count
async fn stream_to_file(
    mut response: reqwest::Response,
    path: &Path,
) -> Result<usize, FetchError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0usize;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;

    if written == 0 {
        return Err(FetchError::EmptyBody);
    }
    Ok(written)
}

#[async_trait]
impl MediaFetcher for TelegramMediaFetcher {
    async fn fetch_to_file(&self, file_id: &str) -> Result<PathBuf, FetchError> {
        let response = self.open(file_id).await?;
        let path = self.scratch_dir.join(scratch_file_name(file_id));

        match stream_to_file(response, &path).await {
            Ok(written) => {
                debug!(file_id, bytes = written, path = %path.display(), "File downloaded");
                Ok(path)
            }
            Err(e) => {
                // Nothing may be left behind for a failed download
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            path = %path.display(),
                            error = %remove_err,
                            "Failed to remove partial download"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    async fn fetch_bytes(&self, file_id: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = self.open(file_id).await?.bytes().await?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody);
        }
        debug!(file_id, bytes = bytes.len(), "File downloaded into memory");
        Ok(bytes.to_vec())
    }
}
