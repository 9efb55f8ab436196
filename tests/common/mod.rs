//! Common test utilities: event recording and assertion helpers.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::cell::RefCell;
use std::rc::Rc;

use gridcore::{EventKind, Grid, GridEvent, Response};

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Events seen by a subscriber, in delivery order.
pub type EventLog = Rc<RefCell<Vec<GridEvent>>>;

/// Subscribe a recorder that lets every event through.
pub fn record_events(grid: &Grid) -> EventLog {
    let log: EventLog = Rc::default();
    let sink = Rc::clone(&log);
    grid.subscribe(move |e: &mut GridEvent| {
        sink.borrow_mut().push(e.clone());
        Response::Continue
    });
    log
}

/// Subscribe a listener that vetoes every event of `kind`.
pub fn veto(grid: &Grid, kind: EventKind) {
    grid.subscribe(move |e: &mut GridEvent| {
        if e.kind() == kind {
            Response::Veto
        } else {
            Response::Continue
        }
    });
}

pub fn kinds(log: &EventLog) -> Vec<EventKind> {
    log.borrow().iter().map(GridEvent::kind).collect()
}
