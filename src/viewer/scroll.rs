//! Scroll origin and visibility for one view.

use std::rc::Rc;

use tracing::trace;

use super::Grid;
use crate::events::GridEvent;
use crate::layout::Viewport;
use crate::types::{Block, Coord};

impl Grid {
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scroll_position(&self) -> (i32, i32) {
        (self.viewport.scroll_x, self.viewport.scroll_y)
    }

    /// New client size. The scroll origin is re-clamped to the content.
    pub fn set_client_size(&mut self, width: i32, height: i32) {
        self.viewport.width = width.max(0);
        self.viewport.height = height.max(0);
        let (x, y) = self.scroll_position();
        self.scroll_to(x, y);
    }

    /// Show or hide (size 0) the label strips of this view.
    pub fn set_label_sizes(&mut self, row_label_width: i32, col_label_height: i32) {
        self.viewport.row_label_width = row_label_width.max(0);
        self.viewport.col_label_height = col_label_height.max(0);
        let (x, y) = self.scroll_position();
        self.scroll_to(x, y);
    }

    /// Scroll to `(x, y)` in content pixels, clamped. Sends
    /// [`GridEvent::Scrolled`] when the origin moved.
    pub fn scroll_to(&mut self, x: i32, y: i32) -> bool {
        let moved = {
            let shared = Rc::clone(&self.shared);
            let st = shared.borrow();
            self.viewport.scroll_to(x, y, &st.rows, &st.cols)
        };
        self.after_scroll(moved)
    }

    pub fn scroll_by(&mut self, dx: i32, dy: i32) -> bool {
        let moved = {
            let shared = Rc::clone(&self.shared);
            let st = shared.borrow();
            self.viewport.scroll_by(dx, dy, &st.rows, &st.cols)
        };
        self.after_scroll(moved)
    }

    fn after_scroll(&mut self, moved: Option<(i32, i32)>) -> bool {
        let Some((dx, dy)) = moved else {
            return false;
        };
        trace!(view = self.view_id().get(), dx, dy, "scrolled");
        let (x, y) = self.scroll_position();
        self.send(GridEvent::Scrolled {
            view: self.view_id(),
            x,
            y,
        });
        true
    }

    /// Scroll the minimum needed to show `coord` (its whole span).
    pub fn make_cell_visible(&mut self, coord: Coord) -> bool {
        let Some(r) = self.cell_rect(coord) else {
            return false;
        };
        let moved = {
            let shared = Rc::clone(&self.shared);
            let st = shared.borrow();
            self.viewport
                .scroll_to_show((r.x, r.right()), (r.y, r.bottom()), &st.rows, &st.cols)
        };
        self.after_scroll(moved)
    }

    /// Whether any part of `coord` is inside the cell area of this view.
    pub fn is_visible(&self, coord: Coord) -> bool {
        let Some(r) = self.cell_rect(coord) else {
            return false;
        };
        let vp = &self.viewport;
        r.right() > vp.scroll_x
            && r.x < vp.scroll_x + vp.cells_width()
            && r.bottom() > vp.scroll_y
            && r.y < vp.scroll_y + vp.cells_height()
    }

    /// Cells at least partly visible in this view.
    pub fn visible_block(&self) -> Option<Block> {
        let st = self.state();
        let (r0, r1) = self.viewport.visible_rows(&st.rows)?;
        let (c0, c1) = self.viewport.visible_cols(&st.cols)?;
        Some(Block::from_corners(Coord::new(r0, c0), Coord::new(r1, c1)))
    }
}
