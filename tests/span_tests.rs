//! Merged cells through the grid: ownership, conflicts, structural updates
//! and geometry.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;
mod fixtures;

use common::*;
use gridcore::{Block, Coord, GridError};
use test_case::test_case;

#[test]
fn test_interior_cells_belong_to_owner() {
    let mut grid = GridBuilder::new(8, 8).build();
    let block = Block::new(2, 1, 3, 4);
    grid.set_span(block).unwrap();
    for coord in block.cells() {
        assert_eq!(grid.owner_of(coord), Coord::new(2, 1));
        assert_eq!(grid.span_of(coord), Some(block));
    }
    assert_eq!(grid.owner_of(Coord::new(5, 1)), Coord::new(5, 1));
}

#[test_case(Block::new(1, 1, 2, 4) ; "touches both spans")]
#[test_case(Block::new(0, 0, 8, 8) ; "covers both spans")]
fn test_overlapping_two_spans_fails(block: Block) {
    let mut grid = GridBuilder::new(8, 8).span("B2:C3").span("E2:F3").build();
    let before = (grid.span_of(Coord::new(1, 1)), grid.span_of(Coord::new(1, 4)));
    assert!(matches!(grid.set_span(block), Err(GridError::SpanConflict(_))));
    assert_eq!((grid.span_of(Coord::new(1, 1)), grid.span_of(Coord::new(1, 4))), before);
}

#[test]
fn test_other_owner_fails_and_same_owner_resizes() {
    let mut grid = GridBuilder::new(8, 8).span("B2:C3").build();
    assert!(grid.set_span(Block::new(2, 2, 2, 2)).is_err());
    grid.set_span(Block::new(1, 1, 1, 4)).unwrap();
    assert_eq!(grid.span_of(Coord::new(1, 4)), Some(Block::new(1, 1, 1, 4)));
    assert_eq!(grid.span_of(Coord::new(2, 2)), None);
    grid.set_span(Block::single(Coord::new(1, 1))).unwrap();
    assert_eq!(grid.span_of(Coord::new(1, 2)), None);
}

#[test]
fn test_out_of_bounds_span_is_rejected() {
    let mut grid = GridBuilder::new(4, 4).build();
    assert!(matches!(
        grid.set_span(Block::new(3, 3, 2, 2)),
        Err(GridError::InvalidCoordinate { .. })
    ));
}

#[test]
fn test_spans_follow_structural_changes() {
    let mut grid = GridBuilder::new(8, 8).span("B2:C4").build();
    grid.insert_rows(0, 2).unwrap();
    assert_eq!(grid.span_of(Coord::new(3, 1)), Some(Block::new(3, 1, 3, 2)));
    grid.insert_cols(2, 1).unwrap();
    assert_eq!(grid.span_of(Coord::new(3, 1)), Some(Block::new(3, 1, 3, 3)));
    grid.delete_rows(3, 2).unwrap();
    assert_eq!(grid.span_of(Coord::new(3, 1)), Some(Block::new(3, 1, 1, 3)));
    grid.delete_cols(1, 3).unwrap();
    assert_eq!(grid.span_of(Coord::new(3, 1)), None);
}

#[test]
fn test_span_rect_covers_every_cell() {
    let mut grid = GridBuilder::new(5, 5).span("B2:C3").build();
    grid.set_col_size(2, 100);
    let rect = grid.cell_rect(Coord::new(2, 2)).unwrap();
    assert_eq!(rect.x, grid.col_size(0));
    assert_eq!(rect.width, grid.col_size(1) + 100);
    assert_eq!(rect.height, grid.row_size(1) + grid.row_size(2));
}

#[test]
fn test_merged_cell_painted_once() {
    let grid = GridBuilder::new(3, 3).value("A1", "big").span("A1:B2").client_size(600, 400).build();
    let cells = grid.render_cells();
    let owners: Vec<_> = cells.iter().filter(|c| c.coord == Coord::new(0, 0)).collect();
    assert_eq!(owners.len(), 1);
    assert!(!cells.iter().any(|c| c.coord == Coord::new(1, 1)));
}
