//! Command Handler module for `/start`, `/help` and the voice picker

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId};
use tracing::{debug, info, warn};

use crate::dialogue::{PickerDialogue, PickerState};
use crate::localization::{t_args_lang, t_lang};
use crate::relay::Services;
use crate::voice::Voice;

use super::message_handler::{language_of, sender_id};
use super::ui_builder::{create_voice_picker_keyboard, format_help_message, format_welcome_message};
use super::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Services,
    dialogue: PickerDialogue,
) -> Result<()> {
    let language_code = language_of(&msg);
    debug!(user_id = sender_id(&msg), command = ?cmd, "Received command from user");

    match cmd {
        Command::Start => {
            let welcome = format_welcome_message(services.settings.accept_documents, language_code);
            bot.send_message(msg.chat.id, welcome).await?;
            bot.send_message(msg.chat.id, "😉").await?;
        }
        Command::Help => {
            let help = format_help_message(services.settings.accept_documents, language_code);
            bot.send_message(msg.chat.id, help).await?;
        }
        Command::Voice => {
            show_voice_picker(&bot, &msg, &services, dialogue, language_code).await?;
        }
    }

    Ok(())
}

/// Send one sample clip per voice followed by the selection keyboard
///
/// Every message sent is recorded in the dialogue. If a send fails midway the
/// messages already sent are deleted and the picker is closed.
async fn show_voice_picker(
    bot: &Bot,
    msg: &Message,
    services: &Services,
    dialogue: PickerDialogue,
    language_code: Option<&str>,
) -> Result<()> {
    let user_id = sender_id(msg);

    // A picker left open earlier is replaced by the new one, keyboard included
    if let Some(previous) = dialogue.get().await? {
        let mut stale: Vec<i32> = previous.picker_messages().to_vec();
        stale.extend(previous.keyboard_message());
        delete_picker_messages(bot, msg.chat.id, &stale).await;
    }

    let mut message_ids = Vec::with_capacity(Voice::ALL.len() + 1);
    match send_picker(bot, msg, services, language_code, &mut message_ids).await {
        Ok(keyboard_id) => {
            info!(user_id, messages = message_ids.len(), "Voice picker shown");
            dialogue
                .update(PickerState::PickerShown {
                    message_ids,
                    keyboard_id,
                })
                .await?;
            Ok(())
        }
        Err(e) => {
            warn!(user_id, error = %e, sent = message_ids.len(), "Voice picker interrupted");
            delete_picker_messages(bot, msg.chat.id, &message_ids).await;
            dialogue.update(PickerState::Idle).await?;
            Err(e)
        }
    }
}

/// Send the picker messages, pushing each id as soon as it is sent
///
/// Returns the id of the keyboard message.
async fn send_picker(
    bot: &Bot,
    msg: &Message,
    services: &Services,
    language_code: Option<&str>,
    message_ids: &mut Vec<i32>,
) -> Result<i32> {
    let intro = bot
        .send_message(msg.chat.id, t_lang("picker-intro", language_code))
        .await?;
    message_ids.push(intro.id.0);

    for voice in Voice::ALL {
        match services.sample_clip(voice).await {
            Ok(path) => {
                let sample = bot
                    .send_voice(msg.chat.id, InputFile::file(path))
                    .caption(voice.as_str())
                    .await?;
                message_ids.push(sample.id.0);
            }
            Err(e) => {
                warn!(voice = %voice, error = %e, "Sample clip unavailable, skipping voice");
            }
        }
    }

    let current = services.voice_for(sender_id(msg)).await;
    let keyboard = bot
        .send_message(
            msg.chat.id,
            t_args_lang("picker-prompt", &[("voice", current.as_str())], language_code),
        )
        .reply_markup(create_voice_picker_keyboard(current, language_code))
        .await?;

    Ok(keyboard.id.0)
}

/// Bulk-delete the messages a picker left in the chat
///
/// Failures are logged only; the messages may already be gone.
pub async fn delete_picker_messages(bot: &Bot, chat_id: ChatId, message_ids: &[i32]) {
    if message_ids.is_empty() {
        return;
    }
    let ids: Vec<MessageId> = message_ids.iter().map(|id| MessageId(*id)).collect();
    match bot.delete_messages(chat_id, ids).await {
        Ok(_) => debug!(chat_id = %chat_id, count = message_ids.len(), "Picker messages deleted"),
        Err(e) => warn!(chat_id = %chat_id, error = %e, "Failed to delete picker messages"),
    }
}
