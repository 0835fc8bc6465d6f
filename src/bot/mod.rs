//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `command_handler`: Handles `/start`, `/help` and the `/voice` picker
//! - `message_handler`: Handles incoming text, voice and document messages
//! - `callback_handler`: Handles picker button presses
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callback_handler;
pub mod command_handler;
pub mod message_handler;
pub mod ui_builder;

use anyhow::Result;
use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::UpdateKind;
use teloxide::utils::command::BotCommands;
use tracing::warn;

use crate::access::REJECTION_REPLY;
use crate::dialogue::PickerState;
use crate::relay::Services;

// Re-export main handler functions
pub use callback_handler::callback_handler;
pub use command_handler::command_handler;
pub use message_handler::{document_handler, text_handler, voice_handler};

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "welcome message")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
    #[command(description = "choose the voice used to read your messages")]
    Voice,
}

/// Build the update handler tree
///
/// Branch order is the dispatch priority: allow-list rejection, commands,
/// picker callbacks, voice messages, documents, then free-form text.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .branch(Message::filter_voice().endpoint(voice_handler))
        .branch(
            Message::filter_document()
                .filter(|services: Services| services.settings.accept_documents)
                .endpoint(document_handler),
        )
        .branch(Message::filter_text().endpoint(text_handler));

    dptree::entry()
        .branch(
            dptree::filter(|update: Update, services: Services| {
                !services.access.admits(update.from().map(|user| user.id))
            })
            .endpoint(reject),
        )
        .branch(
            dialogue::enter::<Update, InMemStorage<PickerState>, PickerState, _>()
                .branch(
                    Update::filter_message()
                        .filter_command::<Command>()
                        .endpoint(command_handler),
                )
                .branch(Update::filter_callback_query().endpoint(callback_handler))
                .branch(messages),
        )
}

/// Answer an update from someone outside the allow-list
async fn reject(bot: Bot, update: Update) -> Result<()> {
    warn!(
        user_id = ?update.from().map(|user| user.id),
        "Rejected update from user outside the allow-list"
    );

    if let UpdateKind::CallbackQuery(q) = &update.kind {
        bot.answer_callback_query(q.id.clone()).await?;
    }
    if let Some(chat) = update.chat() {
        bot.send_message(chat.id, REJECTION_REPLY).await?;
    }
    Ok(())
}
