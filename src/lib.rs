//! gridcore - spreadsheet-style grid engine
//!
//! Everything a grid widget needs apart from the drawing itself:
//! - Row/column sizing, hit testing and per-view scrolling
//! - Layered cell attributes (cell over row over column) with a lookup cache
//! - Data type registry for renderers and editors
//! - Block selection, merged cells and an in-place edit controller
//! - Clipboard codec with a plain-text fallback
//! - Several views sharing one grid, and a 2x2 split layout
//!
//! # Usage
//!
//! ```
//! use gridcore::{Coord, Grid, GridConfig, StringTable, TableHandle};
//!
//! let mut grid = Grid::with_table(
//!     GridConfig::default(),
//!     TableHandle::owned(StringTable::new(10, 4)),
//! );
//! grid.set_cell_value(Coord::new(0, 0), "hello")?;
//! let second = grid.attach_view();
//! assert_eq!(second.cell_value(Coord::new(0, 0)), "hello");
//! # Ok::<(), gridcore::GridError>(())
//! ```

pub mod attr;
pub mod cell_ref;
pub mod clipboard;
pub mod config;
pub mod csv;
pub mod editor;
pub mod error;
pub mod events;
pub mod layout;
pub mod registry;
pub mod render;
pub mod selection;
pub mod spans;
pub mod table;
pub mod types;
pub mod viewer;

pub use attr::{AttrKind, CellAttr, EffectiveAttr};
pub use clipboard::{ClipboardBackend, ClipboardContents, ClipboardPayload, MemoryClipboard};
pub use config::GridConfig;
pub use editor::{CellEditor, EditKey, EditState};
pub use error::{GridError, Result};
pub use events::{EventKind, GridEvent, ListenerId, Response};
pub use layout::CellRect;
pub use registry::TypeRegistry;
pub use render::{CellPainter, CellRenderer, TextMeasure};
pub use selection::SelectionMode;
pub use table::{StringTable, Table, TableNotifier};
pub use types::*;
pub use viewer::{
    Direction, Grid, GridRegion, Modifiers, PaneId, Refresh, SashOrientation, SharedGrid,
    SplitLayout, TableHandle, ViewId,
};

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
