//! Synthetic voices offered by the speech API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Prefix of picker button callback data, e.g. "voice:nova"
pub const CALLBACK_PREFIX: &str = "voice:";
/// Callback data of the picker's cancel button
pub const CALLBACK_CANCEL: &str = "voice:cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Alloy,
    Ash,
    Coral,
    Echo,
    Fable,
    Nova,
    Onyx,
    #[default]
    Shimmer,
}

impl Voice {
    pub const ALL: [Voice; 8] = [
        Voice::Alloy,
        Voice::Ash,
        Voice::Coral,
        Voice::Echo,
        Voice::Fable,
        Voice::Nova,
        Voice::Onyx,
        Voice::Shimmer,
    ];

    /// Name used by the speech API and stored in the database
    pub fn as_str(self) -> &'static str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Ash => "ash",
            Voice::Coral => "coral",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Nova => "nova",
            Voice::Onyx => "onyx",
            Voice::Shimmer => "shimmer",
        }
    }

    pub fn callback_data(self) -> String {
        format!("{CALLBACK_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Voice::ALL
            .into_iter()
            .find(|voice| voice.as_str() == wanted)
            .ok_or_else(|| ParseError::UnknownVoice(s.to_string()))
    }
}

/// What a picker button asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerChoice {
    Select(Voice),
    Cancel,
}

impl PickerChoice {
    /// Decode callback data produced by the picker keyboard
    pub fn from_callback_data(data: &str) -> Option<Self> {
        if data == CALLBACK_CANCEL {
            return Some(PickerChoice::Cancel);
        }
        data.strip_prefix(CALLBACK_PREFIX)
            .and_then(|name| name.parse().ok())
            .map(PickerChoice::Select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_voice_is_shimmer() {
        assert_eq!(Voice::default(), Voice::Shimmer);
        assert_eq!(Voice::default().as_str(), "shimmer");
    }

    #[test]
    fn test_eight_distinct_voices() {
        let names: std::collections::HashSet<_> =
            Voice::ALL.iter().map(|voice| voice.as_str()).collect();
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("nova".parse::<Voice>().unwrap(), Voice::Nova);
        assert_eq!(" Onyx ".parse::<Voice>().unwrap(), Voice::Onyx);
        assert_eq!(
            "robot".parse::<Voice>().unwrap_err(),
            ParseError::UnknownVoice("robot".to_string())
        );
    }

    #[test]
    fn test_picker_choice_from_callback_data() {
        assert_eq!(
            PickerChoice::from_callback_data(&Voice::Fable.callback_data()),
            Some(PickerChoice::Select(Voice::Fable))
        );
        assert_eq!(
            PickerChoice::from_callback_data("voice:cancel"),
            Some(PickerChoice::Cancel)
        );
        assert_eq!(PickerChoice::from_callback_data("voice:robot"), None);
        assert_eq!(PickerChoice::from_callback_data("edit_1"), None);
    }

    #[test]
    fn test_serde_uses_api_names() {
        assert_eq!(serde_json::to_string(&Voice::Coral).unwrap(), "\"coral\"");
        let voice: Voice = serde_json::from_str("\"ash\"").unwrap();
        assert_eq!(voice, Voice::Ash);
    }
}
