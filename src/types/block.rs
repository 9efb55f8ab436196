use serde::{Deserialize, Serialize};

use super::Coord;

/// Rectangle of grid coordinates.
///
/// A block with zero height or width is empty and contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Block {
    pub top: i32,
    pub left: i32,
    pub height: i32,
    pub width: i32,
}

impl Block {
    pub const EMPTY: Block = Block {
        top: 0,
        left: 0,
        height: 0,
        width: 0,
    };

    pub const fn new(top: i32, left: i32, height: i32, width: i32) -> Self {
        Self {
            top,
            left,
            height,
            width,
        }
    }

    /// Block spanning two corners given in any order (inclusive).
    pub fn from_corners(a: Coord, b: Coord) -> Self {
        let top = a.row.min(b.row);
        let left = a.col.min(b.col);
        Self {
            top,
            left,
            height: a.row.max(b.row) - top + 1,
            width: a.col.max(b.col) - left + 1,
        }
    }

    pub fn single(coord: Coord) -> Self {
        Self::new(coord.row, coord.col, 1, 1)
    }

    /// Whole rows `top..top+height` of a grid with `ncols` columns.
    ///
    /// Encoded one column wider than the grid so it can be told apart from a
    /// plain cell block that happens to cover every column.
    pub fn whole_rows(top: i32, height: i32, ncols: i32) -> Self {
        Self::new(top, 0, height, ncols + 1)
    }

    /// Whole columns `left..left+width` of a grid with `nrows` rows.
    pub fn whole_cols(left: i32, width: i32, nrows: i32) -> Self {
        Self::new(0, left, nrows + 1, width)
    }

    pub fn is_whole_rows(&self, ncols: i32) -> bool {
        !self.is_empty() && self.left == 0 && self.width > ncols
    }

    pub fn is_whole_cols(&self, nrows: i32) -> bool {
        !self.is_empty() && self.top == 0 && self.height > nrows
    }

    pub fn is_empty(&self) -> bool {
        self.height <= 0 || self.width <= 0
    }

    pub fn top_left(&self) -> Coord {
        Coord::new(self.top, self.left)
    }

    pub fn bottom_right(&self) -> Coord {
        Coord::new(self.bottom(), self.right())
    }

    /// Last row covered (inclusive).
    pub fn bottom(&self) -> i32 {
        self.top + self.height - 1
    }

    /// Last column covered (inclusive).
    pub fn right(&self) -> i32 {
        self.left + self.width - 1
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            return 0;
        }
        i64::from(self.height) * i64::from(self.width)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        !self.is_empty()
            && coord.row >= self.top
            && coord.row <= self.bottom()
            && coord.col >= self.left
            && coord.col <= self.right()
    }

    pub fn contains_block(&self, other: &Block) -> bool {
        if other.is_empty() {
            return true;
        }
        self.contains(other.top_left()) && self.contains(other.bottom_right())
    }

    pub fn intersects(&self, other: &Block) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Overlap of two blocks; empty when they do not touch.
    pub fn intersection(&self, other: &Block) -> Block {
        if self.is_empty() || other.is_empty() {
            return Block::EMPTY;
        }
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        if bottom < top || right < left {
            return Block::EMPTY;
        }
        Block::new(top, left, bottom - top + 1, right - left + 1)
    }

    /// Smallest block containing both.
    pub fn union(&self, other: &Block) -> Block {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Block::from_corners(
            Coord::new(self.top.min(other.top), self.left.min(other.left)),
            Coord::new(
                self.bottom().max(other.bottom()),
                self.right().max(other.right()),
            ),
        )
    }

    /// Parts of `self` not covered by `other`, at most four rectangles.
    ///
    /// Pieces are the band above the overlap, the band below it, and the
    /// strips left and right of it. They never overlap each other.
    pub fn subtract(&self, other: &Block) -> Vec<Block> {
        let inter = self.intersection(other);
        if inter.is_empty() {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        }
        let mut pieces = Vec::with_capacity(4);
        if inter.top > self.top {
            pieces.push(Block::new(self.top, self.left, inter.top - self.top, self.width));
        }
        if inter.bottom() < self.bottom() {
            pieces.push(Block::new(
                inter.bottom() + 1,
                self.left,
                self.bottom() - inter.bottom(),
                self.width,
            ));
        }
        if inter.left > self.left {
            pieces.push(Block::new(
                inter.top,
                self.left,
                inter.height,
                inter.left - self.left,
            ));
        }
        if inter.right() < self.right() {
            pieces.push(Block::new(
                inter.top,
                inter.right() + 1,
                inter.height,
                self.right() - inter.right(),
            ));
        }
        pieces
    }

    /// Clip to a grid of `rows` x `cols` (drops the whole-row/col sentinel).
    pub fn clamp_to(&self, rows: i32, cols: i32) -> Block {
        self.intersection(&Block::new(0, 0, rows, cols))
    }

    /// Every coordinate, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (top, left) = (self.top, self.left);
        let (bottom, right) = if self.is_empty() {
            (top - 1, left - 1)
        } else {
            (self.bottom(), self.right())
        };
        (top..=bottom).flat_map(move |r| (left..=right).map(move |c| Coord::new(r, c)))
    }
}
