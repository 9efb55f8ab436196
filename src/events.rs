//! Grid notifications and the subscriber bus.
//!
//! Cancelable notifications are sent *before* a change; any subscriber
//! returning [`Response::Veto`] stops the change and leaves the grid exactly
//! as it was. Informational notifications ignore vetoes.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::types::{Block, Coord};
use crate::viewer::{SashOrientation, ViewId};

/// Kind of a [`GridEvent`], used in errors and for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CellChanging,
    CellChanged,
    RangeSelecting,
    RangeSelected,
    EditorEnabling,
    EditorShown,
    EditorDisabling,
    EditorHidden,
    RowSize,
    ColSize,
    Scrolled,
    SplitChanging,
    SplitChanged,
    Unsplit,
}

impl EventKind {
    pub fn is_cancelable(&self) -> bool {
        matches!(
            self,
            Self::CellChanging
                | Self::CellChanged
                | Self::RangeSelecting
                | Self::EditorEnabling
                | Self::EditorDisabling
                | Self::SplitChanging
        )
    }
}

/// Notification sent to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// A value is about to be written. Cancelable.
    CellChanging {
        coord: Coord,
        old: String,
        new: String,
    },
    /// A value was written. Cancelable: a veto restores `old`.
    CellChanged { coord: Coord, old: String },
    /// A range is about to be selected (`add`) or deselected. Cancelable.
    RangeSelecting { block: Block, add: bool },
    /// A range was selected (`add`) or deselected.
    RangeSelected { block: Block, add: bool },
    /// The editor is about to be enabled on `coord`. Cancelable.
    EditorEnabling { coord: Coord },
    EditorShown { coord: Coord },
    /// The active editor is about to be disabled. Cancelable.
    EditorDisabling { coord: Coord },
    EditorHidden { coord: Coord },
    RowSize { row: i32, size: i32 },
    ColSize { col: i32, size: i32 },
    Scrolled { view: ViewId, x: i32, y: i32 },
    /// The sash is being dragged. Subscribers may veto or rewrite `position`.
    SplitChanging {
        orientation: SashOrientation,
        position: i32,
    },
    SplitChanged {
        orientation: SashOrientation,
        position: i32,
    },
    Unsplit {
        orientation: SashOrientation,
        removed: Vec<ViewId>,
    },
}

impl GridEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CellChanging { .. } => EventKind::CellChanging,
            Self::CellChanged { .. } => EventKind::CellChanged,
            Self::RangeSelecting { .. } => EventKind::RangeSelecting,
            Self::RangeSelected { .. } => EventKind::RangeSelected,
            Self::EditorEnabling { .. } => EventKind::EditorEnabling,
            Self::EditorShown { .. } => EventKind::EditorShown,
            Self::EditorDisabling { .. } => EventKind::EditorDisabling,
            Self::EditorHidden { .. } => EventKind::EditorHidden,
            Self::RowSize { .. } => EventKind::RowSize,
            Self::ColSize { .. } => EventKind::ColSize,
            Self::Scrolled { .. } => EventKind::Scrolled,
            Self::SplitChanging { .. } => EventKind::SplitChanging,
            Self::SplitChanged { .. } => EventKind::SplitChanged,
            Self::Unsplit { .. } => EventKind::Unsplit,
        }
    }
}

/// Subscriber verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Response {
    #[default]
    Continue,
    Veto,
}

pub trait GridListener {
    fn on_event(&mut self, event: &mut GridEvent) -> Response;
}

impl<F> GridListener for F
where
    F: FnMut(&mut GridEvent) -> Response,
{
    fn on_event(&mut self, event: &mut GridEvent) -> Response {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct BusInner {
    listeners: Vec<(ListenerId, Box<dyn GridListener>)>,
    /// Unsubscribed while an emission had the listeners checked out.
    removed: Vec<ListenerId>,
    depth: u32,
    next_id: u64,
}

/// Subscriber list shared by every view of a grid.
///
/// Emission never holds a borrow while listeners run, so a listener may call
/// back into the grid. Events raised from inside a listener are not delivered
/// to listeners of the outer emission.
#[derive(Clone, Default)]
pub struct EventBus(Rc<RefCell<BusInner>>);

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.0.borrow().listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe<L: GridListener + 'static>(&self, listener: L) -> ListenerId {
        let mut inner = self.0.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        let mut inner = self.0.borrow_mut();
        inner.listeners.retain(|(lid, _)| *lid != id);
        if inner.depth > 0 {
            inner.removed.push(id);
        }
    }

    /// Deliver `event`. Returns `false` if a cancelable event was vetoed.
    pub fn emit(&self, event: &mut GridEvent) -> bool {
        let mut listeners = {
            let mut inner = self.0.borrow_mut();
            inner.depth += 1;
            std::mem::take(&mut inner.listeners)
        };
        let cancelable = event.kind().is_cancelable();
        let mut allowed = true;
        for (_, listener) in &mut listeners {
            if listener.on_event(event) == Response::Veto && cancelable {
                allowed = false;
                trace!(kind = ?event.kind(), "event vetoed");
                break;
            }
        }

        let mut inner = self.0.borrow_mut();
        inner.depth = inner.depth.saturating_sub(1);
        listeners.retain(|(id, _)| !inner.removed.contains(id));
        listeners.append(&mut inner.listeners);
        inner.listeners = listeners;
        if inner.depth == 0 {
            inner.removed.clear();
        }
        allowed
    }

    /// Convenience for events whose payload the caller does not need back.
    pub fn send(&self, mut event: GridEvent) -> bool {
        self.emit(&mut event)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_veto_only_applies_to_cancelable() {
        let bus = EventBus::default();
        bus.subscribe(|_: &mut GridEvent| Response::Veto);
        assert!(!bus.send(GridEvent::EditorEnabling {
            coord: Coord::new(0, 0)
        }));
        assert!(bus.send(GridEvent::RowSize { row: 0, size: 30 }));
    }

    #[test]
    fn test_listener_may_rewrite_payload() {
        let bus = EventBus::default();
        bus.subscribe(|e: &mut GridEvent| {
            if let GridEvent::SplitChanging { position, .. } = e {
                *position = (*position).min(100);
            }
            Response::Continue
        });
        let mut ev = GridEvent::SplitChanging {
            orientation: SashOrientation::Vertical,
            position: 250,
        };
        assert!(bus.emit(&mut ev));
        assert_eq!(
            ev,
            GridEvent::SplitChanging {
                orientation: SashOrientation::Vertical,
                position: 100
            }
        );
    }

    #[test]
    fn test_unsubscribe_during_emit() {
        let bus = EventBus::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id_cell: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));

        let inner_bus = bus.clone();
        let inner_id = Rc::clone(&id_cell);
        let log = Rc::clone(&seen);
        let id = bus.subscribe(move |e: &mut GridEvent| {
            log.borrow_mut().push(e.kind());
            if let Some(id) = *inner_id.borrow() {
                inner_bus.unsubscribe(id);
            }
            Response::Continue
        });
        *id_cell.borrow_mut() = Some(id);

        bus.send(GridEvent::ColSize { col: 1, size: 10 });
        bus.send(GridEvent::ColSize { col: 1, size: 12 });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe_survives_nested_emit() {
        let bus = EventBus::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let id_cell: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));

        let inner_bus = bus.clone();
        let inner_id = Rc::clone(&id_cell);
        let log = Rc::clone(&seen);
        let id = bus.subscribe(move |e: &mut GridEvent| {
            log.borrow_mut().push(e.kind());
            if let Some(id) = inner_id.borrow_mut().take() {
                inner_bus.unsubscribe(id);
                inner_bus.send(GridEvent::RowSize { row: 0, size: 20 });
            }
            Response::Continue
        });
        *id_cell.borrow_mut() = Some(id);
        let others = Rc::new(RefCell::new(0));
        let count = Rc::clone(&others);
        bus.subscribe(move |_: &mut GridEvent| {
            *count.borrow_mut() += 1;
            Response::Continue
        });

        bus.send(GridEvent::ColSize { col: 1, size: 10 });
        bus.send(GridEvent::ColSize { col: 1, size: 12 });
        assert_eq!(*seen.borrow(), vec![EventKind::ColSize]);
        assert_eq!(*others.borrow(), 2);
    }
}
