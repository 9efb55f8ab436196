//! Default label formatting and A1-style reference parsing.
//!
//! Used for row/column labels when the table supplies none, and by the CLI and
//! tests to address cells and ranges.

use crate::types::{Block, Coord};

/// Convert a 0-based column index to letters (A, B, ..., Z, AA, AB, ...).
pub fn col_label(col: i32) -> String {
    let mut result = String::new();
    let Ok(mut n) = u32::try_from(col) else {
        return result;
    };
    n += 1;
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + offset));
        n /= 26;
    }
    result
}

/// Default 1-based row label.
pub fn row_label(row: i32) -> String {
    if row < 0 {
        return String::new();
    }
    (i64::from(row) + 1).to_string()
}

/// Parse a cell reference like "B3" into a 0-based coordinate.
pub fn parse_cell_ref(cell_ref: &str) -> Option<Coord> {
    let mut col: i64 = 0;
    let mut row: i64 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col * 26 + i64::from(u32::from(upper) - u32::from('A') + 1);
            saw_col = true;
        } else if let Some(d) = ch.to_digit(10) {
            row = row * 10 + i64::from(d);
            saw_row = true;
        } else {
            return None;
        }
        if col > i64::from(i32::MAX) || row > i64::from(i32::MAX) {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some(Coord::new(
        i32::try_from(row - 1).ok()?,
        i32::try_from(col - 1).ok()?,
    ))
}

/// Parse a range like "A1:C4" (or a single "B2") into a block.
pub fn parse_cell_range(range: &str) -> Option<Block> {
    if let Some((start, end)) = range.split_once(':') {
        Some(Block::from_corners(
            parse_cell_ref(start)?,
            parse_cell_ref(end)?,
        ))
    } else {
        parse_cell_ref(range).map(Block::single)
    }
}
