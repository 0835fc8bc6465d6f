//! # Voicebridge Telegram Bot
//!
//! A Telegram bot that reads text messages aloud with a text-to-speech API
//! and answers voice messages with their transcription.

pub mod access;
pub mod bot;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod media;
pub mod preferences;
pub mod relay;
pub mod speech;
pub mod speech_config;
pub mod voice;
