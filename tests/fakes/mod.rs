//! Fake speech, download and preference services shared by the integration
//! tests. Every fake counts the calls made to it.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use voicebridge::access::AccessGuard;
use voicebridge::errors::{FetchError, PreferenceError, SpeechError};
use voicebridge::media::MediaFetcher;
use voicebridge::preferences::{MemoryPreferenceStore, PreferenceStore};
use voicebridge::relay::{RelaySettings, Services};
use voicebridge::speech::{SpeechSynthesizer, SpeechTranscriber};
use voicebridge::voice::Voice;

pub const USER: i64 = 42;

#[derive(Default)]
pub struct FakeSynthesizer {
    pub calls: Mutex<Vec<(String, Voice)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, text: &str, voice: Voice) -> Result<Vec<u8>, SpeechError> {
        self.calls.lock().unwrap().push((text.to_string(), voice));
        if self.fail.load(Ordering::SeqCst) {
            return Err(SpeechError::Api {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            });
        }
        Ok(format!("audio:{voice}:{text}").into_bytes())
    }
}

pub struct FakeTranscriber {
    pub calls: Mutex<Vec<PathBuf>>,
    /// Whether the file existed when transcription was requested
    pub saw_file: AtomicBool,
    pub result: Mutex<Option<String>>,
}

impl FakeTranscriber {
    pub fn returning(text: Option<&str>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            saw_file: AtomicBool::new(false),
            result: Mutex::new(text.map(str::to_string)),
        }
    }
}

#[async_trait]
impl SpeechTranscriber for FakeTranscriber {
    async fn transcribe(&self, path: &Path) -> Result<String, SpeechError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.saw_file.store(path.exists(), Ordering::SeqCst);
        match self.result.lock().unwrap().clone() {
            Some(text) => Ok(text),
            None => Err(SpeechError::Api {
                status: reqwest::StatusCode::BAD_REQUEST,
                body: "unreadable audio".to_string(),
            }),
        }
    }
}

pub struct FakeFetcher {
    pub dir: PathBuf,
    pub content: Vec<u8>,
    pub fail: bool,
    pub file_calls: AtomicUsize,
    pub byte_calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(dir: &Path, content: &[u8]) -> Self {
        Self {
            dir: dir.to_path_buf(),
            content: content.to_vec(),
            fail: false,
            file_calls: AtomicUsize::new(0),
            byte_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(dir: &Path) -> Self {
        Self {
            fail: true,
            ..Self::new(dir, b"")
        }
    }
}

#[async_trait]
impl MediaFetcher for FakeFetcher {
    async fn fetch_to_file(&self, file_id: &str) -> Result<PathBuf, FetchError> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::Status(reqwest::StatusCode::NOT_FOUND));
        }
        let path = self.dir.join(format!("{file_id}.ogg"));
        tokio::fs::write(&path, &self.content).await?;
        Ok(path)
    }

    async fn fetch_bytes(&self, _file_id: &str) -> Result<Vec<u8>, FetchError> {
        self.byte_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::EmptyBody);
        }
        Ok(self.content.clone())
    }
}

pub struct FailingStore;

#[async_trait]
impl PreferenceStore for FailingStore {
    async fn read_voice(&self, _user_id: i64) -> Result<Voice, PreferenceError> {
        Err(PreferenceError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn set_voice(&self, _user_id: i64, _voice: Voice) -> Result<(), PreferenceError> {
        Err(PreferenceError::Database(sqlx::Error::PoolTimedOut))
    }
}

pub struct Harness {
    pub services: Services,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub transcriber: Arc<FakeTranscriber>,
    pub fetcher: Arc<FakeFetcher>,
    _scratch: TempDir,
}

pub fn harness_with(
    fetcher: impl FnOnce(&Path) -> FakeFetcher,
    transcriber: FakeTranscriber,
    preferences: Arc<dyn PreferenceStore>,
    keep_downloads: bool,
) -> Harness {
    let scratch = TempDir::new().unwrap();
    let synthesizer = Arc::new(FakeSynthesizer::default());
    let transcriber = Arc::new(transcriber);
    let fetcher = Arc::new(fetcher(scratch.path()));

    let services = Services {
        access: Arc::new(AccessGuard::new([USER])),
        synthesizer: synthesizer.clone(),
        transcriber: transcriber.clone(),
        fetcher: fetcher.clone(),
        preferences,
        settings: Arc::new(RelaySettings {
            accept_documents: true,
            keep_downloads,
            samples_dir: scratch.path().join("samples"),
        }),
    };

    Harness {
        services,
        synthesizer,
        transcriber,
        fetcher,
        _scratch: scratch,
    }
}

pub fn harness() -> Harness {
    harness_with(
        |dir| FakeFetcher::new(dir, b"hello from a file"),
        FakeTranscriber::returning(Some("transcribed words")),
        Arc::new(MemoryPreferenceStore::new()),
        false,
    )
}

impl Harness {
    /// Same services with document uploads switched on or off
    pub fn with_documents(mut self, accept_documents: bool) -> Self {
        let settings = RelaySettings {
            accept_documents,
            ..(*self.services.settings).clone()
        };
        self.services.settings = Arc::new(settings);
        self
    }
}
