//! Cursor, mouse and selection input for a view.
//!
//! Selection changes go through the cancelable
//! [`GridEvent::RangeSelecting`] notification and are confirmed with
//! [`GridEvent::RangeSelected`].

use tracing::{debug, trace};

use super::Grid;
use crate::error::{GridError, Result};
use crate::events::GridEvent;
use crate::selection::SelectionMode;
use crate::types::{Block, Coord, LABEL};

/// Cursor movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Modifier keys held during a mouse press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Extend from the cursor.
    pub shift: bool,
    /// Add to the selection instead of replacing it.
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragKind {
    Cells,
    Rows,
    Cols,
}

/// Mouse drag in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Drag {
    anchor: Coord,
    kind: DragKind,
    combine: bool,
}

impl Grid {
    // ----- selection ----------------------------------------------------

    pub fn selection_mode(&self) -> SelectionMode {
        self.state().selection.mode()
    }

    /// Change the selection mode. The selection is cleared.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        let mut st = self.state_mut();
        for b in st.selection.set_mode(mode) {
            st.refresh_block(b);
        }
    }

    pub fn selected_blocks(&self) -> Vec<Block> {
        self.state().selection.blocks().to_vec()
    }

    pub fn is_selected(&self, coord: Coord) -> bool {
        let st = self.state();
        st.selection.contains(st.spans.owner_of(coord), false)
    }

    pub fn has_selection(&self) -> bool {
        !self.state().selection.is_empty()
    }

    /// Select `block` (widened to whole merged cells), replacing the current
    /// selection unless `combine`. Returns `false` if a subscriber vetoed.
    pub fn select_block(&mut self, block: Block, combine: bool) -> Result<bool> {
        let block = {
            let st = self.state();
            let block = st.selection.normalized(block)?;
            if block.is_whole_rows(st.number_cols()) || block.is_whole_cols(st.number_rows()) {
                block
            } else {
                st.spans.expand_to_spans(block)
            }
        };
        if !self.send(GridEvent::RangeSelecting { block, add: true }) {
            return Ok(false);
        }
        let added = {
            let mut st = self.state_mut();
            let cleared = if combine {
                Vec::new()
            } else {
                st.selection.blocks().to_vec()
            };
            let added = st.selection.select_block(block, combine)?;
            for b in cleared.into_iter().chain(added.iter().copied()) {
                st.refresh_block(b);
            }
            added
        };
        trace!(?block, pieces = added.len(), "selected");
        self.send(GridEvent::RangeSelected { block, add: true });
        Ok(true)
    }

    /// Remove `block` from the selection.
    pub fn deselect_block(&mut self, block: Block) -> Result<bool> {
        let block = self.state().selection.normalized(block)?;
        if !self.send(GridEvent::RangeSelecting { block, add: false }) {
            return Ok(false);
        }
        {
            let mut st = self.state_mut();
            for b in st.selection.deselect_block(block)? {
                st.refresh_block(b);
            }
        }
        self.send(GridEvent::RangeSelected { block, add: false });
        Ok(true)
    }

    pub fn select_row(&mut self, row: i32, combine: bool) -> Result<bool> {
        self.select_rows(row, 1, combine)
    }

    pub fn select_rows(&mut self, top: i32, count: i32, combine: bool) -> Result<bool> {
        let (rows, cols, mode) = self.dims_and_mode();
        if mode == SelectionMode::Cols {
            return Err(GridError::ModeConflict("row selection in column selection mode".to_string()));
        }
        if top < 0 || count <= 0 || top + count > rows {
            return Err(GridError::invalid(top, LABEL));
        }
        self.select_block(Block::whole_rows(top, count, cols), combine)
    }

    pub fn select_col(&mut self, col: i32, combine: bool) -> Result<bool> {
        self.select_cols(col, 1, combine)
    }

    pub fn select_cols(&mut self, left: i32, count: i32, combine: bool) -> Result<bool> {
        let (rows, cols, mode) = self.dims_and_mode();
        if mode == SelectionMode::Rows {
            return Err(GridError::ModeConflict("column selection in row selection mode".to_string()));
        }
        if left < 0 || count <= 0 || left + count > cols {
            return Err(GridError::invalid(LABEL, left));
        }
        self.select_block(Block::whole_cols(left, count, rows), combine)
    }

    pub fn select_all(&mut self) -> Result<bool> {
        let (rows, cols, _) = self.dims_and_mode();
        if rows == 0 || cols == 0 {
            return Ok(false);
        }
        self.select_block(Block::new(0, 0, rows, cols), false)
    }

    /// Deselect everything. Returns `false` if a subscriber vetoed.
    pub fn clear_selection(&mut self) -> bool {
        let Some(bound) = self.state().selection.bounding_block() else {
            self.state_mut().selection.cancel_selecting();
            return true;
        };
        if !self.send(GridEvent::RangeSelecting {
            block: bound,
            add: false,
        }) {
            return false;
        }
        {
            let mut st = self.state_mut();
            for b in st.selection.clear() {
                st.refresh_block(b);
            }
        }
        self.send(GridEvent::RangeSelected {
            block: bound,
            add: false,
        });
        true
    }

    fn dims_and_mode(&self) -> (i32, i32, SelectionMode) {
        let st = self.state();
        (st.number_rows(), st.number_cols(), st.selection.mode())
    }

    // ----- cursor -------------------------------------------------------

    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// Move the cursor to the owner of `coord` and scroll it into view.
    ///
    /// An active editor elsewhere is closed first (saving per
    /// `save_on_editor_switch`); if that is vetoed the cursor stays.
    pub fn set_cursor(&mut self, coord: Coord) -> Result<bool> {
        let (owner, save) = {
            let st = self.state();
            st.check_cell(coord)?;
            (st.spans.owner_of(coord), st.config.save_on_editor_switch)
        };
        if self.edit_coord().is_some_and(|c| c != owner) && !self.disable_edit(save) {
            return Ok(false);
        }
        let old = self.cursor;
        self.cursor = owner;
        self.anchor = owner;
        {
            let mut st = self.state_mut();
            st.refresh_block(Block::single(old));
            st.refresh_block(Block::single(owner));
        }
        self.make_cell_visible(owner);
        Ok(true)
    }

    /// Next cursor position one step in `dir`, stepping over merged cells.
    fn step(&self, from: Coord, dir: Direction) -> Option<Coord> {
        let st = self.state();
        let span = st.spans.span_of(from).unwrap_or_else(|| Block::single(from));
        let next = match dir {
            Direction::Up => Coord::new(span.top - 1, from.col),
            Direction::Down => Coord::new(span.bottom() + 1, from.col),
            Direction::Left => Coord::new(from.row, span.left - 1),
            Direction::Right => Coord::new(from.row, span.right() + 1),
        };
        next.is_within(st.number_rows(), st.number_cols())
            .then(|| st.spans.owner_of(next))
    }

    /// Move the cursor one cell. With `expand` the selection grows from the
    /// anchor to the new cursor; otherwise it is cleared.
    pub fn move_cursor(&mut self, dir: Direction, expand: bool) -> Result<bool> {
        let from = if expand { self.range_end() } else { self.cursor };
        let Some(next) = self.step(from, dir) else {
            return Ok(false);
        };
        self.move_to(next, expand)
    }

    /// Move to the edge of the current run of filled (or empty) cells, the
    /// way Ctrl+arrow does in a spreadsheet.
    pub fn move_cursor_block(&mut self, dir: Direction, expand: bool) -> Result<bool> {
        let from = if expand { self.range_end() } else { self.cursor };
        let Some(first) = self.step(from, dir) else {
            return Ok(false);
        };
        let filled = |g: &Grid, c: Coord| !g.is_empty_cell(c);
        let target = if filled(self, from) && filled(self, first) {
            // last filled cell of the run
            let mut at = first;
            while let Some(next) = self.step(at, dir).filter(|n| filled(self, *n)) {
                at = next;
            }
            at
        } else {
            // next filled cell, or the edge
            let mut at = first;
            while !filled(self, at) {
                match self.step(at, dir) {
                    Some(next) => at = next,
                    None => break,
                }
            }
            at
        };
        self.move_to(target, expand)
    }

    /// Far corner of a keyboard range selection.
    fn range_end(&self) -> Coord {
        let Some(bound) = self.state().selection.bounding_block() else {
            return self.cursor;
        };
        let row = if bound.top == self.anchor.row { bound.bottom() } else { bound.top };
        let col = if bound.left == self.anchor.col { bound.right() } else { bound.left };
        Coord::new(row, col)
    }

    fn move_to(&mut self, target: Coord, expand: bool) -> Result<bool> {
        if expand {
            let anchor = self.anchor;
            let block = Block::from_corners(anchor, target);
            let selected = self.select_block(block, false)?;
            self.make_cell_visible(target);
            return Ok(selected);
        }
        self.clear_selection();
        let moved = self.set_cursor(target)?;
        debug!(row = target.row, col = target.col, moved, "cursor moved");
        Ok(moved)
    }

    // ----- mouse --------------------------------------------------------

    /// Press at client point `(x, y)`.
    ///
    /// Cells move the cursor and start a drag selection, labels select whole
    /// rows or columns and the corner selects everything.
    pub fn mouse_down(&mut self, x: i32, y: i32, mods: Modifiers) -> Result<bool> {
        let Some(hit) = self.coord_at(x, y) else {
            return Ok(false);
        };
        if hit.is_corner() {
            return self.select_all();
        }
        if hit.is_row_label() {
            self.drag = Some(Drag {
                anchor: hit,
                kind: DragKind::Rows,
                combine: mods.ctrl,
            });
            return self.select_row(hit.row, mods.ctrl);
        }
        if hit.is_col_label() {
            self.drag = Some(Drag {
                anchor: hit,
                kind: DragKind::Cols,
                combine: mods.ctrl,
            });
            return self.select_col(hit.col, mods.ctrl);
        }

        let owner = self.owner_of(hit);
        if mods.shift {
            let anchor = self.anchor;
            return self.select_block(Block::from_corners(anchor, owner), mods.ctrl);
        }
        if !self.set_cursor(owner)? {
            return Ok(false);
        }
        if !mods.ctrl {
            self.clear_selection();
        }
        self.drag = Some(Drag {
            anchor: owner,
            kind: DragKind::Cells,
            combine: mods.ctrl,
        });
        let block = self.drag_block(owner, owner);
        self.state_mut().selection.begin_selecting(block);
        Ok(true)
    }

    fn drag_block(&self, anchor: Coord, to: Coord) -> Block {
        let st = self.state();
        st.spans.expand_to_spans(Block::from_corners(anchor, to))
    }

    /// Drag to client point `(x, y)`. Positions outside the cell area are
    /// clamped to the nearest cell.
    pub fn mouse_drag(&mut self, x: i32, y: i32) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let (cx, cy) = self.viewport.to_content(x, y);
        let to = {
            let st = self.state();
            Coord::new(st.rows.index_at(cy, true), st.cols.index_at(cx, true))
        };
        if to.row < 0 || to.col < 0 {
            return false;
        }
        match drag.kind {
            DragKind::Cells => {
                let block = self.drag_block(drag.anchor, to);
                let mut st = self.state_mut();
                let old = st.selection.selecting();
                st.selection.update_selecting(block);
                if let Some(b) = old {
                    st.refresh_block(b);
                }
                st.refresh_block(block);
                true
            }
            DragKind::Rows => {
                let (top, count) = (drag.anchor.row.min(to.row), (drag.anchor.row - to.row).abs() + 1);
                self.select_rows(top, count, drag.combine).unwrap_or(false)
            }
            DragKind::Cols => {
                let (left, count) = (drag.anchor.col.min(to.col), (drag.anchor.col - to.col).abs() + 1);
                self.select_cols(left, count, drag.combine).unwrap_or(false)
            }
        }
    }

    /// Release the mouse, committing a drag selection.
    pub fn mouse_up(&mut self, x: i32, y: i32) -> Result<bool> {
        let Some(drag) = self.drag.take() else {
            return Ok(false);
        };
        if drag.kind != DragKind::Cells {
            return Ok(true);
        }
        self.mouse_drag_to_end(x, y, drag);
        let Some(block) = self.state_mut().selection.cancel_selecting() else {
            return Ok(false);
        };
        // A plain click selects nothing.
        if block == self.drag_block(drag.anchor, drag.anchor) && !drag.combine {
            self.state_mut().refresh_block(block);
            return Ok(false);
        }
        self.select_block(block, drag.combine)
    }

    fn mouse_drag_to_end(&mut self, x: i32, y: i32, drag: Drag) {
        self.drag = Some(drag);
        self.mouse_drag(x, y);
        self.drag = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::GridConfig;
    use crate::events::Response;
    use crate::table::StringTable;
    use crate::viewer::TableHandle;

    fn grid() -> Grid {
        Grid::with_table(GridConfig::default(), TableHandle::owned(StringTable::new(10, 6)))
    }

    /// Client point inside cell `(row, col)` with default sizes.
    fn at(row: i32, col: i32) -> (i32, i32) {
        (82 + col * 80 + 5, 32 + row * 25 + 5)
    }

    #[test]
    fn test_range_veto_keeps_selection() {
        let mut g = grid();
        g.select_block(Block::new(0, 0, 2, 2), false).unwrap();
        g.subscribe(|e: &mut GridEvent| match e {
            GridEvent::RangeSelecting { .. } => Response::Veto,
            _ => Response::Continue,
        });
        assert!(!g.select_block(Block::new(5, 5, 1, 1), false).unwrap());
        assert_eq!(g.selected_blocks(), vec![Block::new(0, 0, 2, 2)]);
        assert!(!g.clear_selection());
        assert!(g.has_selection());
    }

    #[test]
    fn test_selection_widens_to_spans() {
        let mut g = grid();
        g.set_span(Block::new(1, 1, 2, 2)).unwrap();
        g.select_block(Block::single(Coord::new(2, 2)), false).unwrap();
        assert_eq!(g.selected_blocks(), vec![Block::new(1, 1, 2, 2)]);
        assert!(g.is_selected(Coord::new(1, 2)));
    }

    #[test]
    fn test_mouse_drag_selects() {
        let mut g = grid();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        g.subscribe(move |e: &mut GridEvent| {
            if let GridEvent::RangeSelected { block, add } = e {
                log.borrow_mut().push((*block, *add));
            }
            Response::Continue
        });
        let (x, y) = at(1, 1);
        assert!(g.mouse_down(x, y, Modifiers::default()).unwrap());
        let (x, y) = at(3, 2);
        assert!(g.mouse_drag(x, y));
        assert!(g.mouse_up(x, y).unwrap());
        assert_eq!(g.cursor(), Coord::new(1, 1));
        assert_eq!(g.selected_blocks(), vec![Block::new(1, 1, 3, 2)]);
        assert_eq!(*seen.borrow(), vec![(Block::new(1, 1, 3, 2), true)]);
    }

    #[test]
    fn test_click_labels() {
        let mut g = grid();
        let (_, y) = at(4, 0);
        g.mouse_down(10, y, Modifiers::default()).unwrap();
        g.mouse_up(10, y).unwrap();
        assert!(g.state().selection.is_row_selected(4));

        g.mouse_down(10, 10, Modifiers::default()).unwrap();
        assert_eq!(g.state().selection.selected_cells().len(), 60);
    }

    #[test]
    fn test_row_mode_rejects_columns() {
        let mut g = grid();
        g.set_selection_mode(SelectionMode::Rows);
        assert!(matches!(g.select_col(1, false), Err(GridError::ModeConflict(_))));
        g.select_block(Block::single(Coord::new(2, 2)), false).unwrap();
        assert!(g.state().selection.is_row_selected(2));
    }

    #[test]
    fn test_keyboard_movement() {
        let mut g = grid();
        g.move_cursor(Direction::Right, false).unwrap();
        g.move_cursor(Direction::Down, false).unwrap();
        assert_eq!(g.cursor(), Coord::new(1, 1));
        assert!(g.move_cursor(Direction::Up, false).unwrap());
        assert_eq!(g.cursor(), Coord::new(0, 1));

        g.set_cursor(Coord::new(0, 0)).unwrap();
        assert!(!g.move_cursor(Direction::Left, false).unwrap());
        g.move_cursor(Direction::Down, true).unwrap();
        g.move_cursor(Direction::Right, true).unwrap();
        assert_eq!(g.selected_blocks(), vec![Block::new(0, 0, 2, 2)]);
        assert_eq!(g.cursor(), Coord::new(0, 0));
    }

    #[test]
    fn test_move_over_span() {
        let mut g = grid();
        g.set_span(Block::new(0, 1, 1, 3)).unwrap();
        g.move_cursor(Direction::Right, false).unwrap();
        assert_eq!(g.cursor(), Coord::new(0, 1));
        g.move_cursor(Direction::Right, false).unwrap();
        assert_eq!(g.cursor(), Coord::new(0, 4));
    }

    #[test]
    fn test_block_movement() {
        let mut g = grid();
        for col in 2..5 {
            g.set_cell_value(Coord::new(0, col), "x").unwrap();
        }
        g.move_cursor_block(Direction::Right, false).unwrap();
        assert_eq!(g.cursor(), Coord::new(0, 2));
        g.move_cursor_block(Direction::Right, false).unwrap();
        assert_eq!(g.cursor(), Coord::new(0, 4));
        g.move_cursor_block(Direction::Right, false).unwrap();
        assert_eq!(g.cursor(), Coord::new(0, 5));
    }
}
