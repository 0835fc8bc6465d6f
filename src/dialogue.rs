//! Voice picker dialogue for tracking the messages shown to a chat.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Represents the conversation state of the voice picker
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickerState {
    #[default]
    Idle,
    /// Picker is on screen; `message_ids` must be deleted once a choice is made
    /// and `keyboard_id` is the message carrying the buttons
    PickerShown {
        message_ids: Vec<i32>,
        keyboard_id: i32,
    },
}

impl PickerState {
    /// Messages to clean up when the picker closes
    pub fn picker_messages(&self) -> &[i32] {
        match self {
            PickerState::Idle => &[],
            PickerState::PickerShown { message_ids, .. } => message_ids,
        }
    }

    /// Message holding the keyboard of the open picker
    pub fn keyboard_message(&self) -> Option<i32> {
        match self {
            PickerState::Idle => None,
            PickerState::PickerShown { keyboard_id, .. } => Some(*keyboard_id),
        }
    }

    /// Whether a button press on `message_id` belongs to the open picker
    pub fn owns_keyboard(&self, message_id: i32) -> bool {
        self.keyboard_message() == Some(message_id)
    }
}

/// Type alias for our picker dialogue
pub type PickerDialogue = Dialogue<PickerState, InMemStorage<PickerState>>;
