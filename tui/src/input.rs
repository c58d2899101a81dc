use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Apply an editing key to `value`. Returns `true` when the key was consumed.
pub fn edit(value: &mut String, key: &KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('u') if ctrl => {
            value.clear();
            true
        }
        KeyCode::Char('w') if ctrl => {
            let trimmed = value.trim_end().len();
            value.truncate(trimmed);
            let cut = value.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
            value.truncate(cut);
            true
        }
        KeyCode::Char(c) if !ctrl => {
            value.push(c);
            true
        }
        KeyCode::Backspace => {
            value.pop();
            true
        }
        _ => false,
    }
}

/// Keyboard focus over a fixed number of slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusRing {
    index: usize,
    len: usize,
}

impl FocusRing {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Resize, keeping the index in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }

    pub fn focus(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn is(&self, index: usize) -> bool {
        self.index == index
    }
}

/// Masks a password for display.
pub fn masked(value: &str) -> String {
    "•".repeat(value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_and_backspace() {
        let mut value = String::new();
        assert!(edit(&mut value, &key(KeyCode::Char('h'))));
        assert!(edit(&mut value, &key(KeyCode::Char('i'))));
        assert_eq!(value, "hi");
        assert!(edit(&mut value, &key(KeyCode::Backspace)));
        assert_eq!(value, "h");
        assert!(!edit(&mut value, &key(KeyCode::Enter)));
    }

    #[test]
    fn control_chords_do_not_insert() {
        let mut value = "https://files/a b".to_string();
        assert!(edit(&mut value, &ctrl('w')));
        assert_eq!(value, "https://files/a ");
        assert!(!edit(&mut value, &ctrl('x')));
        assert!(edit(&mut value, &ctrl('u')));
        assert!(value.is_empty());
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut ring = FocusRing::new(3);
        ring.prev();
        assert_eq!(ring.index(), 2);
        ring.next();
        assert_eq!(ring.index(), 0);

        ring.focus(2);
        ring.set_len(2);
        assert_eq!(ring.index(), 1);
    }

    #[test]
    fn password_is_masked_per_char() {
        assert_eq!(masked("pässword").chars().count(), 8);
        assert!(!masked("secret").contains('s'));
    }
}
