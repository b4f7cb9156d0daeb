//! Name prompt line editor.
//!
//! Only characters the score service keeps (`[A-Za-z0-9 _-]`) are accepted,
//! up to the 16-character limit, so what the player sees is what gets saved.

use arrayvec::ArrayString;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::NAME_MAX_LEN;

/// Outcome of one key press in the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameInput {
    /// Still editing.
    Pending,
    /// Enter pressed with the current text.
    Submit(String),
    /// Esc pressed.
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct NameEntry {
    buf: ArrayString<NAME_MAX_LEN>,
}

impl NameEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        self.buf.as_str()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn accepts(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-')
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> NameInput {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return NameInput::Pending;
        }
        match key.code {
            KeyCode::Enter => NameInput::Submit(self.buf.to_string()),
            KeyCode::Esc => NameInput::Cancel,
            KeyCode::Backspace => {
                self.buf.pop();
                NameInput::Pending
            }
            KeyCode::Char(c) if Self::accepts(c) => {
                // Full buffer: ignore further characters.
                let _ = self.buf.try_push(c);
                NameInput::Pending
            }
            _ => NameInput::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(entry: &mut NameEntry, s: &str) {
        for c in s.chars() {
            assert_eq!(entry.handle_key(KeyEvent::from(KeyCode::Char(c))), NameInput::Pending);
        }
    }

    #[test]
    fn test_typing_and_submit() {
        let mut entry = NameEntry::new();
        type_str(&mut entry, "Ada L");
        assert_eq!(entry.as_str(), "Ada L");
        assert_eq!(
            entry.handle_key(KeyEvent::from(KeyCode::Enter)),
            NameInput::Submit("Ada L".into())
        );
    }

    #[test]
    fn test_rejects_disallowed_characters() {
        let mut entry = NameEntry::new();
        type_str(&mut entry, "a<b>!é_c-");
        assert_eq!(entry.as_str(), "ab_c-");
    }

    #[test]
    fn test_length_cap() {
        let mut entry = NameEntry::new();
        type_str(&mut entry, "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(entry.as_str(), "abcdefghijklmnop");
    }

    #[test]
    fn test_backspace_and_cancel() {
        let mut entry = NameEntry::new();
        type_str(&mut entry, "abc");
        entry.handle_key(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(entry.as_str(), "ab");
        assert_eq!(entry.handle_key(KeyEvent::from(KeyCode::Esc)), NameInput::Cancel);
    }

    #[test]
    fn test_ctrl_chords_ignored() {
        let mut entry = NameEntry::new();
        entry.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(entry.as_str(), "");
    }
}
