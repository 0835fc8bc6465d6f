//! Callback Handler module for voice picker button presses

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::dialogue::{PickerDialogue, PickerState};
use crate::localization::{t_args_lang, t_lang};
use crate::relay::{Notice, Services};
use crate::voice::PickerChoice;

use super::command_handler::delete_picker_messages;

/// Handle callback queries from the picker keyboard
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    services: Services,
    dialogue: PickerDialogue,
) -> Result<()> {
    let user_id = q.from.id.0 as i64;
    let language_code = q.from.language_code.as_deref();
    debug!(user_id, data = ?q.data, "Received callback query from user");

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(choice) = q.data.as_deref().and_then(PickerChoice::from_callback_data) else {
        debug!(user_id, "Ignoring callback that is not a picker choice");
        return Ok(());
    };

    // The preference is written before anything else can read it
    let confirmation = match choice {
        PickerChoice::Select(voice) => match services.select_voice(user_id, voice).await {
            Ok(()) => t_args_lang("picker-selected", &[("voice", voice.as_str())], language_code),
            Err(e) => {
                error!(user_id, voice = %voice, error = %e, "Failed to store voice preference");
                t_lang(Notice::StorageFailed.key(), language_code)
            }
        },
        PickerChoice::Cancel => t_lang("picker-cancelled", language_code),
    };

    let Some(message) = &q.message else {
        return Ok(());
    };
    if let Err(e) = bot
        .edit_message_text(message.chat().id, message.id(), confirmation)
        .await
    {
        error!(user_id, error = %e, "Failed to edit picker message");
    }

    // Buttons of a replaced picker must not close the one now on screen
    let state = dialogue.get().await?.unwrap_or_default();
    if !state.owns_keyboard(message.id().0) {
        debug!(user_id, message_id = message.id().0, "Button press on a stale picker");
        return Ok(());
    }

    delete_picker_messages(&bot, dialogue.chat_id(), state.picker_messages()).await;
    dialogue.update(PickerState::Idle).await?;

    Ok(())
}
