//! Quotation Notes
//!
//! Free-text remarks saved with the basket. Only checked notes end up in the
//! exported quotation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Whether the note is printed on the quotation
    pub checked: bool,
    pub text: String,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            checked: true,
            text: text.into(),
        }
    }

    pub fn unchecked(text: impl Into<String>) -> Self {
        Self {
            checked: false,
            text: text.into(),
        }
    }

    /// Checked notes with non-blank text, trimmed, in order
    pub fn exportable(notes: &[Note]) -> Vec<String> {
        notes
            .iter()
            .filter(|n| n.checked)
            .map(|n| n.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Serialize)]
struct NoteOut<'a> {
    state: u8,
    text: &'a str,
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NoteOut {
            state: u8::from(self.checked),
            text: &self.text,
        }
        .serialize(serializer)
    }
}

/// Older files store plain strings, newer ones `{state, text}`
#[derive(Deserialize)]
#[serde(untagged)]
enum NoteIn {
    Plain(String),
    Stateful {
        #[serde(default)]
        state: NoteState,
        #[serde(default)]
        text: String,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NoteState {
    Flag(bool),
    Number(i64),
}

impl Default for NoteState {
    fn default() -> Self {
        NoteState::Number(0)
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match NoteIn::deserialize(deserializer)? {
            NoteIn::Plain(text) => Note::new(text),
            NoteIn::Stateful { state, text } => Note {
                checked: match state {
                    NoteState::Flag(b) => b,
                    NoteState::Number(n) => n == 1,
                },
                text,
            },
        })
    }
}
