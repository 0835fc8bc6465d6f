//! Per-user voice preference storage.
//!
//! `PgPreferenceStore` persists preferences in PostgreSQL;
//! `MemoryPreferenceStore` keeps them for the lifetime of the process when no
//! database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tokio::sync::RwLock;
use tracing::warn;

use crate::db::{read_voice_preference, upsert_voice_preference};
use crate::errors::PreferenceError;
use crate::voice::Voice;

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored voice of a user, or the default voice when none is stored
    async fn read_voice(&self, user_id: i64) -> Result<Voice, PreferenceError>;

    /// Insert or replace the voice of a user
    async fn set_voice(&self, user_id: i64, voice: Voice) -> Result<(), PreferenceError>;
}

#[derive(Debug, Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn read_voice(&self, user_id: i64) -> Result<Voice, PreferenceError> {
        let Some(record) = read_voice_preference(&self.pool, user_id).await? else {
            return Ok(Voice::default());
        };
        match record.voice.parse() {
            Ok(voice) => Ok(voice),
            Err(e) => {
                warn!(user_id, error = %e, "Stored voice is not recognised, using default");
                Ok(Voice::default())
            }
        }
    }

    async fn set_voice(&self, user_id: i64, voice: Voice) -> Result<(), PreferenceError> {
        upsert_voice_preference(&self.pool, user_id, voice.as_str()).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    voices: RwLock<HashMap<i64, Voice>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn read_voice(&self, user_id: i64) -> Result<Voice, PreferenceError> {
        Ok(self
            .voices
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }

    async fn set_voice(&self, user_id: i64, voice: Voice) -> Result<(), PreferenceError> {
        self.voices.write().await.insert(user_id, voice);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryPreferenceStore::new();

        assert_eq!(store.read_voice(1).await.unwrap(), Voice::Shimmer);

        store.set_voice(1, Voice::Nova).await.unwrap();
        assert_eq!(store.read_voice(1).await.unwrap(), Voice::Nova);

        store.set_voice(1, Voice::Echo).await.unwrap();
        assert_eq!(store.read_voice(1).await.unwrap(), Voice::Echo);

        // Other users are unaffected
        assert_eq!(store.read_voice(2).await.unwrap(), Voice::Shimmer);
    }
}
