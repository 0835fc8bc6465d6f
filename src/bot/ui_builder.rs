//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::localization::t_lang;
use crate::voice::{Voice, CALLBACK_CANCEL};

/// Telegram's limit for a single text message
pub const MAX_MESSAGE_CHARS: usize = 4096;

const VOICES_PER_ROW: usize = 2;

/// Create the inline keyboard of the voice picker
pub fn create_voice_picker_keyboard(
    current: Voice,
    language_code: Option<&str>,
) -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = Voice::ALL
        .chunks(VOICES_PER_ROW)
        .map(|row| {
            row.iter()
                .map(|voice| {
                    let label = if *voice == current {
                        format!("✅ {voice}")
                    } else {
                        voice.to_string()
                    };
                    InlineKeyboardButton::callback(label, voice.callback_data())
                })
                .collect()
        })
        .collect();

    buttons.push(vec![InlineKeyboardButton::callback(
        format!("❌ {}", t_lang("picker-cancel", language_code)),
        CALLBACK_CANCEL,
    )]);

    InlineKeyboardMarkup::new(buttons)
}

/// Text of the `/start` reply
pub fn format_welcome_message(accept_documents: bool, language_code: Option<&str>) -> String {
    let mut lines = vec![
        t_lang("welcome-title", language_code),
        t_lang("welcome-description", language_code),
    ];
    if accept_documents {
        lines.push(t_lang("welcome-documents", language_code));
    }
    lines.push(t_lang("welcome-voice", language_code));
    lines.join("\n\n")
}

/// Text of the `/help` reply
pub fn format_help_message(accept_documents: bool, language_code: Option<&str>) -> String {
    let mut lines = vec![
        t_lang("help-title", language_code),
        t_lang("help-text", language_code),
        t_lang("help-voice-message", language_code),
    ];
    if accept_documents {
        lines.push(t_lang("help-document", language_code));
    }
    lines.push(t_lang("help-commands", language_code));
    lines.join("\n")
}

/// Split text into chunks Telegram accepts, preferring line breaks
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max_chars {
            // A single line longer than the limit is cut on char boundaries
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                let piece: String = piece.iter().collect();
                if piece.chars().count() == max_chars {
                    chunks.push(piece);
                } else {
                    current_len = piece.chars().count();
                    current = piece;
                }
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    // Telegram rejects messages with nothing but whitespace
    chunks.retain(|chunk| !chunk.trim().is_empty());
    chunks
}
