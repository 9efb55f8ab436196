//! Cell editors and the key-driven editing session.
//!
//! The host forwards key presses to the active [`EditSession`]; the session
//! keeps the working text and caret and reports when the user commits or
//! cancels. Nothing here touches the table.

use tracing::warn;

use super::mutation::normalize_value;
use crate::render::{TextMeasure, CELL_MARGIN_X};
use crate::types::Font;

/// Key events understood by an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Previous choice for choice editors.
    Up,
    /// Next choice for choice editors.
    Down,
    Enter,
    Tab,
    Escape,
}

/// What the session wants after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep editing.
    Continue,
    /// Key was not accepted by the editor.
    Ignored,
    /// Close the editor and save.
    Commit,
    /// Close the editor without saving.
    Cancel,
}

/// How a cell value is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEditor {
    Text {
        max_len: Option<usize>,
    },
    Number {
        min: Option<i64>,
        max: Option<i64>,
    },
    Float {
        width: Option<u16>,
        precision: Option<u16>,
    },
    /// Check box; space toggles.
    Bool,
    Choice {
        choices: Vec<String>,
        allow_others: bool,
    },
}

impl Default for CellEditor {
    fn default() -> Self {
        Self::Text { max_len: None }
    }
}

impl CellEditor {
    /// Apply a `base:params` parameter string.
    ///
    /// - `Text`: `max_len`
    /// - `Number`: `min,max` (either may be empty)
    /// - `Float`: `width,precision`
    /// - `Choice`: `a,b,c`
    ///
    /// Returns `false` and leaves the editor unchanged on malformed input.
    pub fn set_parameters(&mut self, params: &str) -> bool {
        let ok = match self {
            Self::Text { max_len } => match params.trim() {
                "" => {
                    *max_len = None;
                    true
                }
                p => p.parse().map(|n| *max_len = Some(n)).is_ok(),
            },
            Self::Number { min, max } => match parse_pair::<i64>(params) {
                Some((lo, hi)) => {
                    *min = lo;
                    *max = hi;
                    true
                }
                None => false,
            },
            Self::Float { width, precision } => match parse_pair::<u16>(params) {
                Some((w, p)) => {
                    *width = w;
                    *precision = p;
                    true
                }
                None => false,
            },
            Self::Bool => params.is_empty(),
            Self::Choice { choices, .. } => {
                *choices = params
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                true
            }
        };
        if !ok {
            warn!(params, editor = ?self, "ignoring malformed editor parameters");
        }
        ok
    }

    /// Start an editing session on `initial`.
    pub fn begin_edit(&self, initial: &str) -> EditSession {
        let text = initial.to_string();
        let cursor = text.chars().count();
        EditSession {
            editor: self.clone(),
            original: text.clone(),
            text,
            cursor,
        }
    }

    /// Whether typing `key` is meaningful for this editor.
    pub fn accepts_key(&self, key: EditKey) -> bool {
        let EditKey::Char(c) = key else {
            return true;
        };
        if c.is_control() {
            return false;
        }
        match self {
            Self::Text { .. } => true,
            Self::Number { .. } => c.is_ascii_digit() || c == '-' || c == '+',
            Self::Float { .. } => {
                c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
            }
            Self::Bool => c == ' ',
            Self::Choice { allow_others, .. } => *allow_others,
        }
    }

    /// Width the editor control wants for `value`, in pixels.
    pub fn best_width(&self, value: &str, font: &Font, measure: &dyn TextMeasure) -> i32 {
        let text_w = |s: &str| measure.text_extent(s, font).0;
        let content = match self {
            Self::Choice { choices, .. } => choices
                .iter()
                .map(|c| text_w(c))
                .fold(text_w(value), i32::max),
            Self::Bool => text_w("[x]"),
            _ => text_w(value),
        };
        content + 2 * CELL_MARGIN_X
    }
}

fn parse_pair<T: std::str::FromStr>(params: &str) -> Option<(Option<T>, Option<T>)> {
    let mut parts = params.splitn(2, ',');
    let mut one = || -> Option<Option<T>> {
        match parts.next().map(str::trim) {
            None | Some("") => Some(None),
            Some(v) => v.parse().ok().map(Some),
        }
    };
    let a = one()?;
    let b = one()?;
    Some((a, b))
}

/// Working state of the single active editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    editor: CellEditor,
    original: String,
    text: String,
    /// Caret position in chars.
    cursor: usize,
}

impl EditSession {
    pub fn editor(&self) -> &CellEditor {
        &self.editor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the working text, caret at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(b, _)| b)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn accepts_key(&self, key: EditKey) -> bool {
        if !self.editor.accepts_key(key) {
            return false;
        }
        match (&self.editor, key) {
            (CellEditor::Text { max_len: Some(n) }, EditKey::Char(_)) => self.char_len() < *n,
            _ => true,
        }
    }

    /// Feed one key to the session.
    pub fn apply_key(&mut self, key: EditKey) -> KeyOutcome {
        match key {
            EditKey::Enter | EditKey::Tab => return KeyOutcome::Commit,
            EditKey::Escape => return KeyOutcome::Cancel,
            _ => {}
        }
        if !self.accepts_key(key) {
            return KeyOutcome::Ignored;
        }
        match key {
            EditKey::Char(' ') if self.editor == CellEditor::Bool => {
                let next = if crate::render::is_true(&self.text) { "0" } else { "1" };
                self.set_text(next);
            }
            EditKey::Char(c) => {
                let at = self.byte_at(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
            }
            EditKey::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_at(self.cursor);
                    self.text.remove(at);
                }
            }
            EditKey::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_at(self.cursor);
                    self.text.remove(at);
                }
            }
            EditKey::Left => self.cursor = self.cursor.saturating_sub(1),
            EditKey::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            EditKey::Home => self.cursor = 0,
            EditKey::End => self.cursor = self.char_len(),
            EditKey::Up | EditKey::Down => self.cycle_choice(key == EditKey::Down),
            EditKey::Enter | EditKey::Tab | EditKey::Escape => {}
        }
        KeyOutcome::Continue
    }

    fn cycle_choice(&mut self, forward: bool) {
        let CellEditor::Choice { choices, .. } = &self.editor else {
            return;
        };
        if choices.is_empty() {
            return;
        }
        let n = choices.len();
        let next = match choices.iter().position(|c| *c == self.text) {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        if let Some(choice) = choices.get(next).cloned() {
            self.set_text(&choice);
        }
    }

    /// The validated new value, or `None` if unchanged or invalid.
    pub fn end_edit(&self) -> Option<String> {
        let value = normalize_value(&self.editor, &self.text)?;
        (value != self.original).then_some(value)
    }

    /// Abandon the edit and hand back the original value.
    pub fn cancel(self) -> String {
        self.original
    }

    /// Caret x offset from the text start, for the host caret.
    pub fn caret_x(&self, font: &Font, measure: &dyn TextMeasure) -> i32 {
        let prefix: String = self.text.chars().take(self.cursor).collect();
        measure.text_extent(&prefix, font).0 + CELL_MARGIN_X
    }
}
