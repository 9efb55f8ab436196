//! Selection algebra, selection events, modes and mouse-driven selection.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;
mod fixtures;

use std::collections::BTreeSet;

use common::*;
use gridcore::selection::Selection;
use gridcore::{Block, Coord, EventKind, GridConfig, GridError, GridEvent, Modifiers, SelectionMode};
use proptest::prelude::*;
use test_case::test_case;

const N: i32 = 20;

fn block_in_grid() -> impl Strategy<Value = Block> {
    (0..N, 0..N, 1i32..7, 1i32..7).prop_map(|(top, left, h, w)| Block::new(top, left, h.min(N - top), w.min(N - left)))
}

proptest! {
    #[test]
    fn prop_deselect_undoes_select(
        existing in prop::collection::vec(block_in_grid(), 0..5),
        block in block_in_grid(),
    ) {
        let mut sel = Selection::new(SelectionMode::Cells, N, N);
        for b in existing {
            sel.select_block(b, true).unwrap();
        }
        let before = sel.selected_cells();

        sel.select_block(block, true).unwrap();
        sel.deselect_block(block).unwrap();

        let inside: BTreeSet<Coord> = block.cells().collect();
        let expected: BTreeSet<Coord> = before.difference(&inside).copied().collect();
        prop_assert_eq!(sel.selected_cells(), expected);
        for c in block.cells() {
            prop_assert!(!sel.contains(c, true));
        }
    }

    #[test]
    fn prop_net_new_pieces_cover_exactly_the_new_cells(
        existing in prop::collection::vec(block_in_grid(), 0..5),
        block in block_in_grid(),
    ) {
        let mut sel = Selection::new(SelectionMode::Cells, N, N);
        for b in existing {
            sel.select_block(b, true).unwrap();
        }
        let before = sel.selected_cells();
        let added = sel.select_block(block, true).unwrap();
        let added_cells: BTreeSet<Coord> = added.iter().flat_map(Block::cells).collect();
        let new_cells: BTreeSet<Coord> = sel.selected_cells().difference(&before).copied().collect();
        prop_assert_eq!(added_cells, new_cells);
    }
}

#[test]
fn test_select_sends_selecting_then_selected() {
    let mut grid = GridBuilder::new(10, 10).build();
    let log = record_events(&grid);
    assert!(grid.select_block(Block::new(1, 1, 2, 2), false).unwrap());
    assert_eq!(kinds(&log), vec![EventKind::RangeSelecting, EventKind::RangeSelected]);
    assert!(grid.is_selected(Coord::new(2, 2)));
}

#[test]
fn test_vetoed_selection_changes_nothing() {
    let mut grid = GridBuilder::new(10, 10).build();
    grid.select_block(Block::new(0, 0, 1, 1), false).unwrap();
    veto(&grid, EventKind::RangeSelecting);
    assert!(!grid.select_block(Block::new(5, 5, 2, 2), false).unwrap());
    assert_eq!(grid.selected_blocks(), vec![Block::new(0, 0, 1, 1)]);
    assert!(!grid.clear_selection());
    assert!(grid.has_selection());
}

#[test]
fn test_selection_expands_over_merged_cells() {
    let mut grid = GridBuilder::new(10, 10).span("C3:D5").build();
    grid.select_block(Block::new(0, 0, 3, 3), false).unwrap();
    assert_eq!(grid.selected_blocks(), vec![Block::new(0, 0, 5, 4)]);
}

#[test_case(SelectionMode::Rows, true ; "rows mode rejects columns")]
#[test_case(SelectionMode::Cols, false ; "cols mode rejects rows")]
fn test_mode_conflict(mode: SelectionMode, select_column: bool) {
    let config = GridConfig {
        selection_mode: mode,
        ..GridConfig::default()
    };
    let mut grid = GridBuilder::new(5, 5).config(config).build();
    let result = if select_column {
        grid.select_col(1, false)
    } else {
        grid.select_row(1, false)
    };
    assert!(matches!(result, Err(GridError::ModeConflict(_))));
    assert!(!grid.has_selection());

    // a plain block is widened instead
    grid.select_block(Block::new(2, 2, 1, 1), false).unwrap();
    let widened = if select_column { Coord::new(2, 0) } else { Coord::new(0, 2) };
    assert!(grid.is_selected(widened));
}

#[test]
fn test_structural_change_clears_selection() {
    let mut grid = GridBuilder::new(5, 5).build();
    grid.select_all().unwrap();
    grid.insert_rows(0, 1).unwrap();
    assert!(!grid.has_selection());
}

#[test]
fn test_drag_selects_on_release() {
    let config = GridConfig {
        row_label_width: 40,
        col_label_height: 20,
        ..GridConfig::default()
    };
    let mut grid = GridBuilder::new(10, 10).config(config).client_size(600, 400).build();
    // B2 is at client (120..200, 45..70)
    assert!(grid.mouse_down(130, 50, Modifiers::default()).unwrap());
    assert_eq!(grid.cursor(), Coord::new(1, 1));
    assert!(grid.mouse_drag(300, 110));
    assert!(!grid.has_selection());
    assert!(grid.mouse_up(300, 110).unwrap());
    assert_eq!(grid.selected_blocks(), vec![Block::from_corners(Coord::new(1, 1), Coord::new(3, 3))]);
}

#[test]
fn test_click_without_drag_selects_nothing() {
    let mut grid = GridBuilder::new(10, 10).client_size(600, 400).build();
    let x = grid.config().row_label_width + 10;
    let y = grid.config().col_label_height + 10;
    grid.mouse_down(x, y, Modifiers::default()).unwrap();
    assert!(!grid.mouse_up(x, y).unwrap());
    assert!(!grid.has_selection());
}

#[test]
fn test_label_click_selects_row() {
    let mut grid = GridBuilder::new(10, 10).client_size(600, 400).build();
    let log = record_events(&grid);
    let y = grid.config().col_label_height + 30;
    assert!(grid.mouse_down(5, y, Modifiers::default()).unwrap());
    assert!(log.borrow().iter().any(|e| matches!(
        e,
        GridEvent::RangeSelected { block, add: true } if block.top == 1 && block.height == 1
    )));
    grid.mouse_up(5, y).unwrap();
    assert!(grid.is_selected(Coord::new(1, 9)));
}
