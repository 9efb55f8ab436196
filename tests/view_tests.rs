//! Several views over one grid, table binding and batched refresh.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;
mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use common::*;
use gridcore::{Coord, EventKind, Grid, GridConfig, GridEvent, Refresh, StringTable, Table, TableHandle};

#[test]
fn test_views_share_state_but_not_scroll() {
    let mut first = GridBuilder::new(100, 20).client_size(400, 300).build();
    let mut second = first.attach_view();
    second.set_client_size(400, 300);
    assert_eq!(first.view_count(), 2);
    assert_ne!(first.view_id(), second.view_id());

    first.set_cell_value(Coord::new(5, 5), "both").unwrap();
    assert_eq!(second.cell_value(Coord::new(5, 5)), "both");
    first.set_col_size(3, 200);
    assert_eq!(second.col_size(3), 200);

    second.scroll_to(0, 500);
    assert_eq!(first.scroll_position(), (0, 0));
    assert_eq!(second.scroll_position(), (0, 500));
}

#[test]
fn test_scrolled_event_names_the_view() {
    let first = GridBuilder::new(100, 20).client_size(400, 300).build();
    let mut second = first.attach_view();
    second.set_client_size(400, 300);
    let log = record_events(&first);
    second.scroll_by(0, 100);
    let events = log.borrow();
    assert!(matches!(
        events.last(),
        Some(GridEvent::Scrolled { view, y: 100, .. }) if *view == second.view_id()
    ));
}

#[test]
fn test_last_detach_releases_state() {
    let mut first = GridBuilder::new(4, 4).build();
    let mut second = first.attach_view();
    second.detach();
    second.detach();
    assert_eq!(first.view_count(), 1);
    assert!(first.has_table());
    first.detach();
    assert!(!first.is_attached());
    assert!(!second.has_table());
}

#[test]
fn test_owned_and_shared_tables() {
    let table = Rc::new(RefCell::new(StringTable::new(3, 3)));
    {
        let shared: Rc<RefCell<dyn Table>> = table.clone();
        let mut grid = Grid::with_table(GridConfig::default(), TableHandle::Shared(shared));
        grid.set_cell_value(Coord::new(1, 1), "outlives").unwrap();
    }
    assert_eq!(table.borrow().value(Coord::new(1, 1)), "outlives");

    let mut grid = GridBuilder::new(2, 2).build();
    let taken = grid.take_table().unwrap();
    assert!(taken.is_owned());
    assert!(!grid.has_table());
    assert_eq!(grid.number_rows(), 0);
    assert_eq!(grid.row_label(4), "5");
    assert_eq!(grid.col_label(26), "AA");
}

#[test]
fn test_table_edits_behind_the_grid_are_synced() {
    let table = Rc::new(RefCell::new(StringTable::new(3, 3)));
    let shared: Rc<RefCell<dyn Table>> = table.clone();
    let mut grid = Grid::with_table(GridConfig::default(), TableHandle::Shared(shared));
    grid.select_all().unwrap();

    table.borrow_mut().append_rows(2);
    table.borrow_mut().delete_cols(0, 1);
    assert_eq!(grid.sync_table(), 2);
    assert_eq!((grid.number_rows(), grid.number_cols()), (5, 2));
    assert!(!grid.has_selection());
}

#[test]
fn test_batch_defers_refresh() {
    let mut grid = GridBuilder::new(5, 5).build();
    grid.take_refresh();
    grid.begin_batch();
    grid.set_cell_value(Coord::new(0, 0), "a").unwrap();
    grid.begin_batch();
    grid.set_cell_value(Coord::new(4, 4), "b").unwrap();
    grid.end_batch();
    assert!(grid.take_refresh().is_none());
    // the data is already there
    assert_eq!(grid.cell_value(Coord::new(4, 4)), "b");
    grid.end_batch();
    match grid.take_refresh() {
        Some(Refresh::Blocks(blocks)) => assert_eq!(blocks.len(), 2),
        other => assert!(matches!(other, Some(Refresh::All)), "unexpected {other:?}"),
    }
    assert!(grid.take_refresh().is_none());
}

#[test]
fn test_resize_events_are_informational() {
    let mut grid = GridBuilder::new(5, 5).build();
    veto(&grid, EventKind::RowSize);
    assert!(grid.set_row_size(1, 60));
    assert_eq!(grid.row_size(1), 60);
    assert!(!grid.set_row_size(1, 60));
}

#[test]
fn test_auto_size_column_fits_longest_value() {
    let mut grid = GridBuilder::new(3, 3)
        .value("A1", "short")
        .value("A2", "a much longer value in this column")
        .build();
    let width = grid.auto_size_col(0).unwrap();
    assert!(width > grid.config().default_col_width);
    assert_eq!(grid.col_size(0), width);
}
