//! In-place cell editing.
//!
//! `EditController` tracks the single active editor of a grid:
//! - `Idle`: nothing is being edited
//! - `Enabled(coord)`: an editing session exists for `coord`
//! - `Shown(coord)`: the editor control is visible over the cell
//!
//! The controller only holds state. The grid drives the transitions, sends
//! the cancelable notifications and writes committed values to the table
//! (see `viewer::edit`).

mod input;
pub(crate) mod mutation;

pub use input::{CellEditor, EditKey, EditSession, KeyOutcome};

use tracing::trace;

use crate::layout::CellRect;
use crate::types::Coord;

/// Edit controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Enabled(Coord),
    Shown(Coord),
}

/// Active editor binding, shared by every view of a grid.
#[derive(Debug, Clone, Default)]
pub struct EditController {
    state: EditState,
    session: Option<EditSession>,
    /// Editor rectangle in content coordinates while shown. Wider than the
    /// cell when the editor overflows into empty neighbours.
    rect: Option<CellRect>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Enabled or shown.
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, EditState::Idle)
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, EditState::Shown(_))
    }

    pub fn edit_coord(&self) -> Option<Coord> {
        match self.state {
            EditState::Idle => None,
            EditState::Enabled(c) | EditState::Shown(c) => Some(c),
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn editor_rect(&self) -> Option<CellRect> {
        self.rect
    }

    /// `Idle` → `Enabled(coord)`. Fails if an editor is already active.
    pub fn enable(&mut self, coord: Coord, session: EditSession) -> bool {
        if self.is_enabled() {
            return false;
        }
        trace!(row = coord.row, col = coord.col, "editor enabled");
        self.state = EditState::Enabled(coord);
        self.session = Some(session);
        true
    }

    /// `Enabled` → `Shown`, or move the control of an already shown editor.
    pub fn show(&mut self, rect: CellRect) -> bool {
        let (EditState::Enabled(coord) | EditState::Shown(coord)) = self.state else {
            return false;
        };
        self.state = EditState::Shown(coord);
        self.rect = Some(rect);
        true
    }

    /// `Shown` → `Enabled`.
    pub fn hide(&mut self) -> bool {
        let EditState::Shown(coord) = self.state else {
            return false;
        };
        self.state = EditState::Enabled(coord);
        self.rect = None;
        true
    }

    /// Any state → `Idle`, handing back the released session.
    pub fn release(&mut self) -> Option<(Coord, EditSession)> {
        let coord = self.edit_coord();
        self.state = EditState::Idle;
        self.rect = None;
        let session = self.session.take();
        if let Some(c) = coord {
            trace!(row = c.row, col = c.col, "editor released");
        }
        coord.zip(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect() -> CellRect {
        CellRect {
            x: 0,
            y: 0,
            width: 80,
            height: 25,
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut ec = EditController::new();
        assert!(!ec.show(rect()));
        let at = Coord::new(1, 2);
        assert!(ec.enable(at, CellEditor::default().begin_edit("x")));
        assert_eq!(ec.state(), EditState::Enabled(at));
        assert!(!ec.enable(Coord::new(0, 0), CellEditor::default().begin_edit("")));

        assert!(ec.show(rect()));
        assert!(ec.is_shown());
        assert_eq!(ec.editor_rect(), Some(rect()));
        assert!(ec.hide());
        assert_eq!(ec.state(), EditState::Enabled(at));
        assert_eq!(ec.editor_rect(), None);

        let (coord, session) = ec.release().unwrap();
        assert_eq!(coord, at);
        assert_eq!(session.text(), "x");
        assert_eq!(ec.state(), EditState::Idle);
        assert!(ec.release().is_none());
    }

    #[test]
    fn test_release_from_shown() {
        let mut ec = EditController::new();
        ec.enable(Coord::new(0, 0), CellEditor::Bool.begin_edit("1"));
        ec.show(rect());
        assert!(ec.release().is_some());
        assert!(!ec.is_enabled());
        assert!(ec.session().is_none());
    }
}
