use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::{debug, info};

/// Represents a stored voice preference
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePreference {
    pub telegram_id: i64,
    pub voice: String,
    pub updated_at: DateTime<Utc>,
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS voice_preferences (
            telegram_id BIGINT PRIMARY KEY,
            voice TEXT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create voice_preferences table")?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Read the stored preference of a user
pub async fn read_voice_preference(
    pool: &PgPool,
    telegram_id: i64,
) -> Result<Option<VoicePreference>, sqlx::Error> {
    debug!(telegram_id, "Reading voice preference");

    let row = sqlx::query(
        "SELECT telegram_id, voice, updated_at FROM voice_preferences WHERE telegram_id = $1",
    )
    .bind(telegram_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| {
        Ok(VoicePreference {
            telegram_id: row.try_get("telegram_id")?,
            voice: row.try_get("voice")?,
            updated_at: row.try_get("updated_at")?,
        })
    })
    .transpose()
}

/// Insert or replace the preference of a user
pub async fn upsert_voice_preference(
    pool: &PgPool,
    telegram_id: i64,
    voice: &str,
) -> Result<(), sqlx::Error> {
    debug!(telegram_id, voice, "Upserting voice preference");

    sqlx::query(
        "INSERT INTO voice_preferences (telegram_id, voice, updated_at)
         VALUES ($1, $2, NOW())
         ON CONFLICT (telegram_id)
         DO UPDATE SET voice = EXCLUDED.voice, updated_at = EXCLUDED.updated_at",
    )
    .bind(telegram_id)
    .bind(voice)
    .execute(pool)
    .await?;

    Ok(())
}
