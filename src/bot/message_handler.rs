//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{Document, InputFile, ReplyParameters, Voice as VoiceNote};
use tracing::debug;

use crate::localization::t_lang;
use crate::relay::{Reply, Services};

use super::ui_builder::{split_message, MAX_MESSAGE_CHARS};

/// Telegram language code of the sender
pub(crate) fn language_of(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_deref())
}

/// Sender id, falling back to the chat id for anonymous senders
pub(crate) fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .unwrap_or(msg.chat.id.0)
}

/// Send a relay result back to the chat the message came from
pub async fn deliver_reply(bot: &Bot, msg: &Message, reply: Reply) -> Result<()> {
    match reply {
        Reply::Voice(audio) => {
            bot.send_voice(msg.chat.id, InputFile::memory(audio))
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;
        }
        Reply::Text(text) => {
            let mut reply_to = Some(msg.id);
            for chunk in split_message(&text, MAX_MESSAGE_CHARS) {
                let request = bot.send_message(msg.chat.id, chunk);
                match reply_to.take() {
                    Some(id) => request.reply_parameters(ReplyParameters::new(id)).await?,
                    None => request.await?,
                };
            }
        }
        Reply::Notice(notice) => {
            bot.send_message(msg.chat.id, t_lang(notice.key(), language_of(msg)))
                .await?;
        }
        Reply::Silent => {}
    }
    Ok(())
}

/// Free-form text is read aloud with the sender's voice
pub async fn text_handler(bot: Bot, msg: Message, text: String, services: Services) -> Result<()> {
    let user_id = sender_id(&msg);
    debug!(user_id, message_length = text.len(), "Received text message from user");

    let reply = services.speak(user_id, &text).await;
    deliver_reply(&bot, &msg, reply).await
}

/// Voice messages are answered with their transcription
pub async fn voice_handler(
    bot: Bot,
    msg: Message,
    voice: VoiceNote,
    services: Services,
) -> Result<()> {
    let user_id = sender_id(&msg);
    debug!(user_id, duration = ?voice.duration, "Received voice message from user");

    let reply = services
        .transcribe_voice(user_id, &voice.file.id.0)
        .await;
    deliver_reply(&bot, &msg, reply).await
}

/// Plain text documents are read aloud, anything else is refused
pub async fn document_handler(
    bot: Bot,
    msg: Message,
    doc: Document,
    services: Services,
) -> Result<()> {
    let user_id = sender_id(&msg);
    let mime_type = doc.mime_type.as_ref().map(|mime| mime.to_string());
    debug!(user_id, mime_type = ?mime_type, "Received document from user");

    let reply = services
        .speak_document(user_id, mime_type.as_deref(), &doc.file.id.0)
        .await;
    deliver_reply(&bot, &msg, reply).await
}
