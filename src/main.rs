use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voicebridge::bot::{self, Command};
use voicebridge::config::BotConfig;
use voicebridge::db;
use voicebridge::dialogue::PickerState;
use voicebridge::localization::init_localization;
use voicebridge::media::TelegramMediaFetcher;
use voicebridge::preferences::{MemoryPreferenceStore, PgPreferenceStore, PreferenceStore};
use voicebridge::relay::{RelaySettings, Services};
use voicebridge::speech::OpenAiSpeechClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();
    info!("Starting Voicebridge Telegram Bot");

    init_localization()?;

    let config = BotConfig::from_env().context("Invalid configuration")?;
    info!(
        allowed_users = config.access.len(),
        accept_documents = config.accept_documents,
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.scratch_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.scratch_dir.display()))?;

    let preferences: Arc<dyn PreferenceStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to preference database");
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            db::init_database_schema(&pool).await?;
            Arc::new(PgPreferenceStore::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, voice preferences are kept in memory");
            Arc::new(MemoryPreferenceStore::new())
        }
    };

    let bot = Bot::new(&config.telegram_token);
    let speech = Arc::new(OpenAiSpeechClient::new(config.speech.clone()));

    let services = Services {
        access: Arc::new(config.access.clone()),
        synthesizer: speech.clone(),
        transcriber: speech,
        fetcher: Arc::new(TelegramMediaFetcher::new(bot.clone(), &config.scratch_dir)),
        preferences,
        settings: Arc::new(RelaySettings {
            accept_documents: config.accept_documents,
            keep_downloads: config.keep_downloads,
            samples_dir: config.samples_dir.clone(),
        }),
    };

    bot.set_my_commands(Command::bot_commands()).await?;
    let me = bot.get_me().await?;
    info!(username = ?me.username, "Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![
            services,
            InMemStorage::<PickerState>::new(),
            me
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
