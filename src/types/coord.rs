use serde::{Deserialize, Serialize};

/// Index used on one axis to address the label row or label column.
pub const LABEL: i32 = -1;

/// Grid coordinate.
///
/// Non-negative on both axes addresses a cell. `-1` on one axis addresses a
/// row or column label, `(-1, -1)` is the corner label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const CORNER: Coord = Coord {
        row: LABEL,
        col: LABEL,
    };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// A regular grid cell (both indices non-negative).
    pub fn is_cell(&self) -> bool {
        self.row >= 0 && self.col >= 0
    }

    /// The label of row `self.row`.
    pub fn is_row_label(&self) -> bool {
        self.row >= 0 && self.col == LABEL
    }

    /// The label of column `self.col`.
    pub fn is_col_label(&self) -> bool {
        self.row == LABEL && self.col >= 0
    }

    pub fn is_corner(&self) -> bool {
        self.row == LABEL && self.col == LABEL
    }

    /// Whether this is a cell inside a grid of `rows` x `cols`.
    pub fn is_within(&self, rows: i32, cols: i32) -> bool {
        self.is_cell() && self.row < rows && self.col < cols
    }

    pub fn offset(&self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row.saturating_add(drow),
            col: self.col.saturating_add(dcol),
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Row or column axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Col,
}

/// Convert a non-negative grid index to a vector index.
pub(crate) fn to_index(i: i32) -> Option<usize> {
    usize::try_from(i).ok()
}

/// Convert a length to a grid index, saturating at `i32::MAX`.
pub(crate) fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
