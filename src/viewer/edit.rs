//! In-place editor lifecycle for a view.
//!
//! `Idle → Enabled → Shown` and back. Enabling and disabling are cancelable;
//! showing and hiding are informational. The commit on disable writes through
//! [`Grid::set_cell_value`], so its notifications apply as well, and the
//! controller is idle afterwards whatever they decide.

use tracing::{debug, warn};

use super::{Direction, Grid, Modifiers};
use crate::editor::{EditKey, EditState, KeyOutcome};
use crate::error::{GridError, Result};
use crate::events::GridEvent;
use crate::layout::CellRect;
use crate::types::{Block, Coord};

impl Grid {
    pub fn edit_state(&self) -> EditState {
        self.state().editor.state()
    }

    pub fn is_editing(&self) -> bool {
        self.state().editor.is_enabled()
    }

    pub fn is_editor_shown(&self) -> bool {
        self.state().editor.is_shown()
    }

    pub fn edit_coord(&self) -> Option<Coord> {
        self.state().editor.edit_coord()
    }

    /// Working text of the active editor.
    pub fn editor_text(&self) -> Option<String> {
        self.state().editor.session().map(|s| s.text().to_string())
    }

    pub fn set_editor_text(&mut self, text: &str) -> bool {
        let done = match self.state_mut().editor.session_mut() {
            Some(s) => {
                s.set_text(text);
                true
            }
            None => false,
        };
        if done && self.is_editor_shown() {
            self.show_editor();
        }
        done
    }

    /// Client rectangle of the shown editor in this view.
    pub fn editor_rect(&self) -> Option<CellRect> {
        let r = self.state().editor.editor_rect()?;
        let (x, y) = self.viewport.to_screen(r.x, r.y);
        Some(CellRect { x, y, ..r })
    }

    /// Whether an editor may be enabled on `coord` right now, ignoring
    /// subscribers.
    pub fn can_enable_edit(&self, coord: Coord) -> bool {
        let ok = {
            let st = self.state();
            st.config.editable && st.check_cell(coord).is_ok()
        };
        ok && !self.is_read_only(coord)
    }

    /// Enable the editor at the cursor.
    pub fn enable_edit(&mut self) -> Result<bool> {
        let cursor = self.cursor;
        self.enable_edit_at(cursor)
    }

    /// Start editing the owner of `coord` and show the editor.
    ///
    /// Sends the cancelable [`GridEvent::EditorEnabling`] before anything
    /// changes; a veto leaves any editor already active untouched. An editor
    /// active elsewhere is then closed, saving per `save_on_editor_switch`.
    pub fn enable_edit_at(&mut self, coord: Coord) -> Result<bool> {
        let (owner, save) = {
            let st = self.state();
            st.check_cell(coord)?;
            if !st.config.editable {
                return Err(GridError::ModeConflict("grid is not editable".to_string()));
            }
            (st.spans.owner_of(coord), st.config.save_on_editor_switch)
        };
        if self.is_read_only(owner) {
            return Err(GridError::ReadOnly {
                row: owner.row,
                col: owner.col,
            });
        }
        if self.edit_coord() == Some(owner) {
            return Ok(true);
        }
        if !self.send(GridEvent::EditorEnabling { coord: owner }) {
            debug!(row = owner.row, col = owner.col, "editor enabling vetoed");
            return Ok(false);
        }
        if !self.disable_edit(save) {
            return Ok(false);
        }

        let editor = self.editor_for(owner);
        let value = self.cell_value(owner);
        let session = editor.begin_edit(&value);
        if !self.state_mut().editor.enable(owner, session) {
            warn!(row = owner.row, col = owner.col, "editor already active");
            return Ok(false);
        }
        self.show_editor();
        Ok(true)
    }

    /// Show the enabled editor, or re-place a shown one.
    ///
    /// The editor covers the cell, widened over empty neighbours when its
    /// text does not fit and the cell allows overflow.
    pub fn show_editor(&mut self) -> bool {
        let Some((coord, text)) = ({
            let st = self.state();
            st.editor
                .edit_coord()
                .zip(st.editor.session().map(|s| s.text().to_string()))
        }) else {
            return false;
        };
        let Some(mut rect) = self.cell_rect(coord) else {
            return false;
        };
        let attr = self.effective_attr(coord);
        if attr.overflow {
            let measure = self.measure();
            let needed = attr.editor.best_width(&text, &attr.font, measure.as_ref());
            if needed > rect.width {
                rect.width = self.overflow_width(coord, rect.width, needed);
            }
        }
        let was_shown = self.is_editor_shown();
        if !self.state_mut().editor.show(rect) {
            return false;
        }
        self.state_mut().refresh_block(Block::single(coord));
        if !was_shown {
            self.send(GridEvent::EditorShown { coord });
        }
        true
    }

    pub fn hide_editor(&mut self) -> bool {
        let Some(coord) = self.edit_coord() else {
            return false;
        };
        if !self.state_mut().editor.hide() {
            return false;
        }
        self.send(GridEvent::EditorHidden { coord });
        true
    }

    /// Close the active editor, writing its value back when `save`.
    ///
    /// Returns whether the controller is idle afterwards: `false` only when
    /// a subscriber vetoed [`GridEvent::EditorDisabling`].
    pub fn disable_edit(&mut self, save: bool) -> bool {
        let Some(coord) = self.edit_coord() else {
            return true;
        };
        if !self.send(GridEvent::EditorDisabling { coord }) {
            debug!(row = coord.row, col = coord.col, "editor disabling vetoed");
            return false;
        }
        self.hide_editor();
        let released = self.state_mut().editor.release();
        let Some((coord, session)) = released else {
            return true;
        };
        if !save {
            return true;
        }
        if let Some(value) = session.end_edit() {
            match self.set_cell_value(coord, &value) {
                Ok(written) => debug!(row = coord.row, col = coord.col, written, "edit committed"),
                Err(e) => warn!(%e, "edit commit failed"),
            }
        }
        true
    }

    /// Drop the active editor without saving or notifying.
    pub(crate) fn release_editor(&mut self) {
        if let Some((coord, _)) = self.state_mut().editor.release() {
            debug!(row = coord.row, col = coord.col, "editor dropped");
        }
    }

    /// Feed a key to the active editor. Enter/Tab commit, Escape cancels.
    pub fn edit_key(&mut self, key: EditKey) -> KeyOutcome {
        let outcome = match self.state_mut().editor.session_mut() {
            Some(session) => session.apply_key(key),
            None => return KeyOutcome::Ignored,
        };
        match outcome {
            KeyOutcome::Commit => {
                self.disable_edit(true);
            }
            KeyOutcome::Cancel => {
                self.disable_edit(false);
            }
            KeyOutcome::Continue => {
                self.show_editor();
            }
            KeyOutcome::Ignored => {}
        }
        outcome
    }

    /// Spreadsheet keyboard handling.
    ///
    /// While editing, keys go to the editor and a commit by Enter or Tab
    /// moves the cursor down or right. Otherwise arrows move the cursor
    /// (Shift extends, Ctrl jumps over runs), Enter starts editing, typing
    /// starts editing with the typed character and Delete clears the cell.
    pub fn key_down(&mut self, key: EditKey, mods: Modifiers) -> Result<bool> {
        if self.is_editing() {
            let outcome = self.edit_key(key);
            let advance = match (outcome, key) {
                (KeyOutcome::Commit, EditKey::Enter) => Some(Direction::Down),
                (KeyOutcome::Commit, EditKey::Tab) => Some(Direction::Right),
                _ => None,
            };
            if let Some(dir) = advance {
                self.move_cursor(dir, false)?;
            }
            return Ok(outcome != KeyOutcome::Ignored);
        }
        let dir = match key {
            EditKey::Up => Some(Direction::Up),
            EditKey::Down => Some(Direction::Down),
            EditKey::Left => Some(Direction::Left),
            EditKey::Right | EditKey::Tab => Some(Direction::Right),
            _ => None,
        };
        if let Some(dir) = dir {
            return if mods.ctrl {
                self.move_cursor_block(dir, mods.shift)
            } else {
                self.move_cursor(dir, mods.shift)
            };
        }
        match key {
            EditKey::Enter => self.enable_edit(),
            EditKey::Char(c) => {
                if !self.enable_edit()? {
                    return Ok(false);
                }
                let accepted = self
                    .state()
                    .editor
                    .session()
                    .is_some_and(|s| s.editor().accepts_key(key));
                if accepted {
                    self.set_editor_text(&c.to_string());
                }
                Ok(true)
            }
            EditKey::Delete | EditKey::Backspace => {
                let cursor = self.cursor;
                if self.is_read_only(cursor) {
                    return Ok(false);
                }
                self.set_cell_value(cursor, "")
            }
            _ => Ok(false),
        }
    }
}
