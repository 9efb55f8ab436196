//! Geometry tests: pixel/index mapping, structural changes and hit testing.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;
mod fixtures;

use common::*;
use gridcore::layout::AxisSizing;
use gridcore::{AttrKind, CellAttr, Coord, GridConfig, LABEL};
use proptest::prelude::*;
use test_case::test_case;

proptest! {
    #[test]
    fn prop_index_at_inverts_start_on_default_sizes(count in 1i32..400, size in 1i32..60) {
        let axis = AxisSizing::new(count, size, 0);
        prop_assert!(!axis.has_overrides());
        for i in 0..count {
            prop_assert_eq!(axis.index_at(axis.start(i), false), i);
            prop_assert_eq!(axis.index_at(axis.end(i) - 1, false), i);
        }
    }

    #[test]
    fn prop_index_at_inverts_start_with_explicit_sizes(
        count in 1i32..300,
        default in 5i32..40,
        overrides in prop::collection::vec((0i32..300, 1i32..90), 1..40),
    ) {
        let mut axis = AxisSizing::new(count, default, 1);
        for (i, size) in overrides {
            axis.set_size(i % count, size);
        }
        for i in 0..count {
            prop_assert_eq!(axis.index_at(axis.start(i), true), i);
            prop_assert_eq!(axis.index_at(axis.end(i) - 1, true), i);
        }
    }
}

#[test_case(-5, false => -1 ; "negative unclipped")]
#[test_case(-5, true => 0 ; "negative clipped")]
#[test_case(250, false => -1 ; "past the end unclipped")]
#[test_case(250, true => 9 ; "past the end clipped")]
#[test_case(0, false => 0 ; "first pixel")]
#[test_case(249, false => 9 ; "last pixel")]
fn test_index_at_bounds(pos: i32, clip: bool) -> i32 {
    AxisSizing::new(10, 25, 15).index_at(pos, clip)
}

#[test]
fn test_set_size_below_minimum_is_ignored() {
    let mut axis = AxisSizing::new(10, 25, 15);
    assert!(!axis.set_size(3, 10));
    assert!(!axis.has_overrides());
    assert!(axis.set_size(3, 50));
    assert_eq!(axis.total(), 275);
    assert_eq!(axis.start(4), 125);
    assert_eq!(axis.index_at(124, false), 3);
}

#[test]
fn test_append_then_delete_restores_rows() {
    let mut grid = GridBuilder::new(5, 4).value("A1", "a").value("D5", "z").build();
    grid.set_row_size(1, 40);
    let mut row_attr = CellAttr::new();
    row_attr.set_back_color("#FFEEDD");
    grid.set_row_attr(2, Some(row_attr)).unwrap();
    let mut cell_attr = CellAttr::new();
    cell_attr.set_text_color("#0000FF");
    grid.set_cell_attr(Coord::new(4, 3), cell_attr).unwrap();

    let before: Vec<i32> = (0..5).map(|r| grid.row_size(r)).collect();

    assert!(grid.append_rows(3).unwrap());
    assert_eq!(grid.number_rows(), 8);
    assert!(grid.delete_rows(5, 3).unwrap());

    assert_eq!(grid.number_rows(), 5);
    let after: Vec<i32> = (0..5).map(|r| grid.row_size(r)).collect();
    assert_eq!(after, before);
    let row = grid.attr(Coord::new(2, 0), AttrKind::Row).unwrap();
    assert_eq!(row.back_color().as_deref(), Some("#FFEEDD"));
    let cell = grid.attr(Coord::new(4, 3), AttrKind::Cell).unwrap();
    assert_eq!(cell.text_color().as_deref(), Some("#0000FF"));
    assert_eq!(grid.cell_value(Coord::new(4, 3)), "z");
}

#[test]
fn test_insert_shifts_sizes_and_attributes() {
    let mut grid = GridBuilder::new(6, 3).value("A3", "x").build();
    grid.set_row_size(2, 60);
    grid.set_read_only(Coord::new(2, 0), true).unwrap();

    assert!(grid.insert_rows(1, 2).unwrap());
    assert_eq!(grid.row_size(4), 60);
    assert_eq!(grid.row_size(2), grid.config().default_row_height);
    assert!(grid.is_read_only(Coord::new(4, 0)));
    assert!(!grid.is_read_only(Coord::new(2, 0)));
    assert_eq!(grid.cell_value(Coord::new(4, 0)), "x");
}

#[test_case(6, 1 => false ; "delete at row count")]
#[test_case(5, 10 => true ; "oversized count is clamped")]
#[test_case(0, 0 => false ; "zero count")]
fn test_delete_bounds(pos: i32, count: i32) -> bool {
    let mut grid = GridBuilder::new(6, 3).build();
    grid.delete_rows(pos, count).unwrap_or(false)
}

#[test]
fn test_coord_at_hits_labels_and_cells() {
    let config = GridConfig {
        row_label_width: 40,
        col_label_height: 20,
        ..GridConfig::default()
    };
    let grid = GridBuilder::new(10, 10).config(config).client_size(400, 300).build();
    assert_eq!(grid.coord_at(5, 5), Some(Coord::new(LABEL, LABEL)));
    assert_eq!(grid.coord_at(5, 30), Some(Coord::new(0, LABEL)));
    assert_eq!(grid.coord_at(130, 5), Some(Coord::new(LABEL, 1)));
    assert_eq!(grid.coord_at(130, 50), Some(Coord::new(1, 1)));
}
