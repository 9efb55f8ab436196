//! Block-based selection model.
//!
//! The selection is an ordered list of committed blocks plus one transient
//! block for an in-progress drag. Blocks may overlap; membership is the union.
//! Whole rows (columns) are stored one column (row) wider than the grid so
//! they stay whole when columns (rows) are added.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::{GridError, Result};
use crate::types::{Block, Coord};

/// What the user may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    Cells,
    /// Every selection is widened to whole rows; column selection is rejected.
    Rows,
    /// Every selection is widened to whole columns; row selection is rejected.
    Cols,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    blocks: Vec<Block>,
    selecting: Option<Block>,
    mode: SelectionMode,
    rows: i32,
    cols: i32,
}

impl Selection {
    pub fn new(mode: SelectionMode, rows: i32, cols: i32) -> Self {
        Self {
            mode,
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the mode. The selection is cleared; the cleared blocks are
    /// returned for refresh.
    pub fn set_mode(&mut self, mode: SelectionMode) -> Vec<Block> {
        self.mode = mode;
        self.clear()
    }

    /// New grid extent. The selection is cleared rather than patched.
    pub fn set_dimensions(&mut self, rows: i32, cols: i32) -> Vec<Block> {
        self.rows = rows;
        self.cols = cols;
        self.clear()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selecting(&self) -> Option<Block> {
        self.selecting
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drop everything, including the in-progress block.
    pub fn clear(&mut self) -> Vec<Block> {
        self.selecting = None;
        std::mem::take(&mut self.blocks)
    }

    /// Apply the selection mode to a requested block.
    pub fn normalized(&self, block: Block) -> Result<Block> {
        if block.is_empty() {
            return Err(GridError::ModeConflict("empty block".to_string()));
        }
        let whole_rows = block.is_whole_rows(self.cols);
        let whole_cols = block.is_whole_cols(self.rows);
        match self.mode {
            SelectionMode::Cells => Ok(block),
            SelectionMode::Rows if whole_cols && !whole_rows => Err(GridError::ModeConflict(
                "column selection in row selection mode".to_string(),
            )),
            SelectionMode::Rows => Ok(Block::whole_rows(block.top, block.height, self.cols)),
            SelectionMode::Cols if whole_rows && !whole_cols => Err(GridError::ModeConflict(
                "row selection in column selection mode".to_string(),
            )),
            SelectionMode::Cols => Ok(Block::whole_cols(block.left, block.width, self.rows)),
        }
    }

    /// Parts of `block` not already selected.
    fn uncovered(&self, block: Block) -> Vec<Block> {
        let mut rest = vec![block];
        for b in &self.blocks {
            rest = rest.iter().flat_map(|r| r.subtract(b)).collect();
            if rest.is_empty() {
                break;
            }
        }
        rest
    }

    /// Add `block`, replacing the selection unless `combine`.
    ///
    /// Returns the net-new sub-blocks (minimal refresh area). Blocks already
    /// covered by `block` are dropped from the list.
    pub fn select_block(&mut self, block: Block, combine: bool) -> Result<Vec<Block>> {
        let block = self.normalized(block).inspect_err(|e| warn!(%e, "selection rejected"))?;
        if !combine {
            self.clear();
        }
        let added = self.uncovered(block);
        if added.is_empty() {
            return Ok(added);
        }
        self.blocks.retain(|b| !block.contains_block(b));
        self.blocks.push(block);
        trace!(?block, pieces = added.len(), "block selected");
        Ok(added)
    }

    /// Remove exactly the overlap with `block` from every stored block.
    ///
    /// Returns the removed sub-blocks.
    pub fn deselect_block(&mut self, block: Block) -> Result<Vec<Block>> {
        let block = self.normalized(block)?;
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.blocks.len());
        for b in std::mem::take(&mut self.blocks) {
            let overlap = b.intersection(&block);
            if overlap.is_empty() {
                kept.push(b);
                continue;
            }
            removed.push(overlap);
            for piece in b.subtract(&block) {
                let whole = piece.is_whole_rows(self.cols) || piece.is_whole_cols(self.rows);
                let piece = if whole {
                    piece
                } else {
                    piece.clamp_to(self.rows, self.cols)
                };
                if !piece.is_empty() {
                    kept.push(piece);
                }
            }
        }
        self.blocks = kept;
        trace!(?block, pieces = removed.len(), "block deselected");
        Ok(removed)
    }

    pub fn select_row(&mut self, row: i32, combine: bool) -> Result<Vec<Block>> {
        self.select_rows(row, 1, combine)
    }

    pub fn select_rows(&mut self, top: i32, count: i32, combine: bool) -> Result<Vec<Block>> {
        if self.mode == SelectionMode::Cols {
            warn!(top, "row selection in column selection mode");
            return Err(GridError::ModeConflict(
                "row selection in column selection mode".to_string(),
            ));
        }
        self.select_block(Block::whole_rows(top, count, self.cols), combine)
    }

    pub fn select_col(&mut self, col: i32, combine: bool) -> Result<Vec<Block>> {
        self.select_cols(col, 1, combine)
    }

    pub fn select_cols(&mut self, left: i32, count: i32, combine: bool) -> Result<Vec<Block>> {
        if self.mode == SelectionMode::Rows {
            warn!(left, "column selection in row selection mode");
            return Err(GridError::ModeConflict(
                "column selection in row selection mode".to_string(),
            ));
        }
        self.select_block(Block::whole_cols(left, count, self.rows), combine)
    }

    pub fn select_all(&mut self) -> Result<Vec<Block>> {
        self.select_block(Block::new(0, 0, self.rows, self.cols), false)
    }

    /// Start a drag selection at `block`.
    pub fn begin_selecting(&mut self, block: Block) {
        self.selecting = self.normalized(block).ok();
    }

    pub fn update_selecting(&mut self, block: Block) {
        if self.selecting.is_some() {
            self.selecting = self.normalized(block).ok();
        }
    }

    pub fn cancel_selecting(&mut self) -> Option<Block> {
        self.selecting.take()
    }

    /// Commit the in-progress block. Returns the net-new sub-blocks.
    pub fn commit_selecting(&mut self, combine: bool) -> Result<Vec<Block>> {
        match self.selecting.take() {
            Some(b) => self.select_block(b, combine),
            None => Ok(Vec::new()),
        }
    }

    /// Whether `coord` is selected.
    pub fn contains(&self, coord: Coord, include_selecting: bool) -> bool {
        self.blocks.iter().any(|b| b.contains(coord))
            || (include_selecting && self.selecting.is_some_and(|b| b.contains(coord)))
    }

    /// Whether every coordinate of `block` is selected.
    pub fn contains_block(&self, block: &Block, include_selecting: bool) -> bool {
        let mut rest = self.uncovered(*block);
        if include_selecting {
            if let Some(s) = self.selecting {
                rest = rest.iter().flat_map(|r| r.subtract(&s)).collect();
            }
        }
        rest.is_empty()
    }

    pub fn is_row_selected(&self, row: i32) -> bool {
        self.cols > 0 && self.contains_block(&Block::new(row, 0, 1, self.cols), false)
    }

    pub fn is_col_selected(&self, col: i32) -> bool {
        self.rows > 0 && self.contains_block(&Block::new(0, col, self.rows, 1), false)
    }

    /// Smallest block (inside the grid) holding every selected cell.
    pub fn bounding_block(&self) -> Option<Block> {
        let bound = self
            .blocks
            .iter()
            .map(|b| b.clamp_to(self.rows, self.cols))
            .fold(Block::EMPTY, |acc, b| acc.union(&b));
        (!bound.is_empty()).then_some(bound)
    }

    /// Every selected cell inside the grid, row-major.
    pub fn selected_cells(&self) -> BTreeSet<Coord> {
        self.blocks
            .iter()
            .flat_map(|b| b.clamp_to(self.rows, self.cols).cells())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sel() -> Selection {
        Selection::new(SelectionMode::Cells, 10, 10)
    }

    #[test]
    fn test_select_returns_net_new() {
        let mut s = sel();
        let added = s.select_block(Block::new(0, 0, 2, 2), false).unwrap();
        assert_eq!(added, vec![Block::new(0, 0, 2, 2)]);
        let added = s.select_block(Block::new(1, 1, 2, 2), true).unwrap();
        let area: i64 = added.iter().map(Block::area).sum();
        assert_eq!(area, 3);
        assert!(s.select_block(Block::new(0, 0, 1, 1), true).unwrap().is_empty());
    }

    #[test]
    fn test_replace_without_combine() {
        let mut s = sel();
        s.select_block(Block::new(0, 0, 2, 2), false).unwrap();
        s.select_block(Block::new(5, 5, 1, 1), false).unwrap();
        assert!(!s.contains(Coord::new(0, 0), false));
        assert!(s.contains(Coord::new(5, 5), false));
    }

    #[test]
    fn test_deselect_middle_of_row() {
        let mut s = sel();
        s.select_row(3, false).unwrap();
        let removed = s.deselect_block(Block::single(Coord::new(3, 4))).unwrap();
        assert_eq!(removed, vec![Block::new(3, 4, 1, 1)]);
        assert!(!s.contains(Coord::new(3, 4), false));
        assert!(s.contains(Coord::new(3, 3), false));
        assert!(s.contains(Coord::new(3, 9), false));
        assert!(!s.is_row_selected(3));
        assert_eq!(s.selected_cells().len(), 9);
    }

    #[test]
    fn test_mode_conflicts() {
        let mut s = Selection::new(SelectionMode::Rows, 10, 10);
        assert!(matches!(s.select_col(1, false), Err(GridError::ModeConflict(_))));
        s.select_block(Block::new(2, 3, 1, 1), false).unwrap();
        assert!(s.is_row_selected(2));

        let mut s = Selection::new(SelectionMode::Cols, 10, 10);
        assert!(s.select_row(1, false).is_err());
        s.select_block(Block::new(2, 3, 1, 1), false).unwrap();
        assert!(s.is_col_selected(3));
        assert!(!s.is_empty());
    }

    #[test]
    fn test_drag_selecting() {
        let mut s = sel();
        s.begin_selecting(Block::single(Coord::new(1, 1)));
        s.update_selecting(Block::from_corners(Coord::new(1, 1), Coord::new(3, 2)));
        assert!(s.contains(Coord::new(3, 2), true));
        assert!(!s.contains(Coord::new(3, 2), false));
        let added = s.commit_selecting(false).unwrap();
        assert_eq!(added, vec![Block::new(1, 1, 3, 2)]);
        assert!(s.selecting().is_none());
        assert_eq!(s.bounding_block(), Some(Block::new(1, 1, 3, 2)));
    }

    #[test]
    fn test_dimensions_clear() {
        let mut s = sel();
        s.select_all().unwrap();
        let cleared = s.set_dimensions(12, 10);
        assert_eq!(cleared.len(), 1);
        assert!(s.is_empty());
        assert_eq!(s.bounding_block(), None);
    }
}
