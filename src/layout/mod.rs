//! Geometry: per-axis sizing and per-view viewport management.
//!
//! This module handles:
//! - Row heights and column widths with lazily materialized explicit sizes
//! - Pixel to row/column index mapping
//! - Scroll origin, visible range and client/content conversion per view

mod sizing;
mod viewport;

pub use sizing::AxisSizing;
pub use viewport::Viewport;

use crate::types::Coord;

/// Rectangle of a cell (or merged cell) in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CellRect {
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Rectangle covering rows `top..=bottom` and columns `left..=right`.
pub fn block_rect(rows: &AxisSizing, cols: &AxisSizing, top_left: Coord, bottom_right: Coord) -> CellRect {
    let x = cols.start(top_left.col);
    let y = rows.start(top_left.row);
    CellRect {
        x,
        y,
        width: cols.end(bottom_right.col) - x,
        height: rows.end(bottom_right.row) - y,
    }
}
