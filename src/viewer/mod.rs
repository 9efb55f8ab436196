//! Grid views over shared grid state.
//!
//! A grid is one [`SharedGridState`] (table binding, sizing, attributes,
//! spans, selection, editor, registry and subscribers) viewed through one or
//! more [`Grid`] windows. Each view keeps only its own scroll origin, client
//! size, cursor and attribute lookup cache. Views are created with
//! [`Grid::new`] or [`Grid::attach_view`]; the shared state is released when
//! the last view detaches.
//!
//! Submodules add the rest of the view API:
//! - `attrs`: attribute access, renderer/editor resolution and painting
//! - `scroll`: scroll origin and visibility
//! - `events`: cursor, mouse and selection input
//! - `edit`: in-place editor lifecycle
//! - `clipboard`: copy, cut and paste
//! - `split`: up to four panes sharing one grid

mod attrs;
mod clipboard;
mod edit;
mod events;
mod scroll;
mod split;

pub use attrs::GridRegion;
pub use events::{Direction, Modifiers};
pub use split::{PaneId, SashOrientation, SplitLayout};

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::attr::{AttrCache, AttrStore, EffectiveAttr};
use crate::cell_ref;
use crate::clipboard::{ClipboardBackend, MemoryClipboard};
use crate::config::GridConfig;
use crate::editor::EditController;
use crate::error::{GridError, Result};
use crate::events::{EventBus, EventKind, GridEvent, GridListener, ListenerId};
use crate::layout::{block_rect, AxisSizing, CellRect, Viewport};
use crate::registry::TypeRegistry;
use crate::render::{selection_rects, FixedPitchMeasure, SelectionRect, TextMeasure};
use crate::selection::Selection;
use crate::spans::SpanSet;
use crate::table::{Table, TableMessage, TableNotifier};
use crate::types::{Axis, Block, Coord, LABEL};

/// Identifies one view of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// How the grid holds its table.
///
/// An owned table is destroyed with the grid. A shared one is only released;
/// whoever else holds it keeps it alive.
pub enum TableHandle {
    Owned(Box<dyn Table>),
    Shared(Rc<RefCell<dyn Table>>),
}

impl std::fmt::Debug for TableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owned(_) => f.write_str("TableHandle::Owned"),
            Self::Shared(_) => f.write_str("TableHandle::Shared"),
        }
    }
}

impl TableHandle {
    pub fn owned(table: impl Table + 'static) -> Self {
        Self::Owned(Box::new(table))
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&dyn Table) -> R) -> R {
        match self {
            Self::Owned(t) => f(t.as_ref()),
            Self::Shared(t) => f(&*t.borrow()),
        }
    }

    pub(crate) fn write<R>(&mut self, f: impl FnOnce(&mut dyn Table) -> R) -> R {
        match self {
            Self::Owned(t) => f(t.as_mut()),
            Self::Shared(t) => f(&mut *t.borrow_mut()),
        }
    }
}

/// Area to repaint, accumulated until [`Grid::take_refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    All,
    Blocks(Vec<Block>),
}

#[derive(Debug, Default)]
struct RefreshQueue {
    all: bool,
    blocks: Vec<Block>,
}

/// Root attributes of the four grid regions.
#[derive(Debug, Clone)]
pub(crate) struct RegionDefaults {
    pub(crate) cells: EffectiveAttr,
    pub(crate) row_labels: EffectiveAttr,
    pub(crate) col_labels: EffectiveAttr,
    pub(crate) corner: EffectiveAttr,
}

impl RegionDefaults {
    fn from_config(config: &GridConfig) -> Self {
        Self {
            cells: config.cell_defaults.clone(),
            row_labels: config.label_defaults.clone(),
            col_labels: config.label_defaults.clone(),
            corner: config.label_defaults.clone(),
        }
    }
}

/// State shared by every view of one grid.
pub struct SharedGridState {
    pub(crate) config: GridConfig,
    pub(crate) table: Option<TableHandle>,
    pub(crate) notifier: TableNotifier,
    pub(crate) rows: AxisSizing,
    pub(crate) cols: AxisSizing,
    pub(crate) attrs: AttrStore,
    /// Bumped on every change that can alter an attribute lookup.
    pub(crate) attr_generation: u64,
    pub(crate) defaults: RegionDefaults,
    pub(crate) spans: SpanSet,
    pub(crate) selection: Selection,
    pub(crate) editor: EditController,
    pub(crate) registry: TypeRegistry,
    pub(crate) events: EventBus,
    pub(crate) clipboard: Box<dyn ClipboardBackend>,
    pub(crate) measure: Rc<dyn TextMeasure>,
    views: Vec<ViewId>,
    /// Views whose detach found the state borrowed.
    detached: DetachQueue,
    next_view: u64,
    batch_depth: u32,
    refresh: RefreshQueue,
}

type DetachQueue = Rc<RefCell<Vec<ViewId>>>;

impl std::fmt::Debug for SharedGridState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGridState")
            .field("rows", &self.rows.count())
            .field("cols", &self.cols.count())
            .field("table", &self.table)
            .field("views", &self.views)
            .field("batch_depth", &self.batch_depth)
            .finish_non_exhaustive()
    }
}

/// Handle to the shared state of a grid.
pub type SharedGrid = Rc<RefCell<SharedGridState>>;

impl SharedGridState {
    fn new(config: GridConfig) -> Self {
        Self {
            rows: AxisSizing::new(0, config.default_row_height, config.min_row_height),
            cols: AxisSizing::new(0, config.default_col_width, config.min_col_width),
            selection: Selection::new(config.selection_mode, 0, 0),
            defaults: RegionDefaults::from_config(&config),
            config,
            table: None,
            notifier: TableNotifier::new(),
            attrs: AttrStore::new(),
            attr_generation: 0,
            spans: SpanSet::new(),
            editor: EditController::new(),
            registry: TypeRegistry::new(),
            events: EventBus::default(),
            clipboard: Box::new(MemoryClipboard::new()),
            measure: Rc::new(FixedPitchMeasure),
            views: Vec::new(),
            detached: DetachQueue::default(),
            next_view: 0,
            batch_depth: 0,
            refresh: RefreshQueue::default(),
        }
    }

    pub fn number_rows(&self) -> i32 {
        self.rows.count()
    }

    pub fn number_cols(&self) -> i32 {
        self.cols.count()
    }

    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Drop the views queued by a deferred detach. The table and its
    /// state are released once no view is left.
    fn reap_detached(&mut self) {
        let gone = std::mem::take(&mut *self.detached.borrow_mut());
        if gone.is_empty() {
            return;
        }
        self.views.retain(|v| !gone.contains(v));
        trace!(detached = gone.len(), remaining = self.views.len(), "views detached");
        if self.views.is_empty() {
            self.release();
        }
    }

    fn new_view(&mut self) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        self.views.push(id);
        id
    }

    /// `NotReady` without a table, `InvalidCoordinate` outside the grid.
    pub(crate) fn check_cell(&self, coord: Coord) -> Result<()> {
        if self.table.is_none() {
            return Err(GridError::NotReady);
        }
        if !coord.is_within(self.number_rows(), self.number_cols()) {
            return Err(GridError::invalid(coord.row, coord.col));
        }
        Ok(())
    }

    pub(crate) fn value(&self, coord: Coord) -> String {
        self.table
            .as_ref()
            .map(|t| t.read(|t| t.value(coord)))
            .unwrap_or_default()
    }

    pub(crate) fn is_empty_cell(&self, coord: Coord) -> bool {
        self.table
            .as_ref()
            .map_or(true, |t| t.read(|t| t.is_empty_cell(coord)))
    }

    pub(crate) fn write_value(&mut self, coord: Coord, value: &str) {
        if let Some(t) = self.table.as_mut() {
            t.write(|t| t.set_value(coord, value));
        }
    }

    pub(crate) fn type_name(&self, coord: Coord) -> Option<String> {
        self.table.as_ref().map(|t| t.read(|t| t.type_name(coord)))
    }

    pub(crate) fn invalidate_attrs(&mut self) {
        self.attr_generation += 1;
    }

    pub(crate) fn refresh_block(&mut self, block: Block) {
        if self.refresh.all || block.is_empty() {
            return;
        }
        let block = self.spans.expand_to_spans(block);
        self.refresh.blocks.push(block);
    }

    pub(crate) fn refresh_all(&mut self) {
        self.refresh.all = true;
        self.refresh.blocks.clear();
    }

    fn take_refresh(&mut self) -> Option<Refresh> {
        if self.batch_depth > 0 {
            return None;
        }
        if std::mem::take(&mut self.refresh.all) {
            self.refresh.blocks.clear();
            return Some(Refresh::All);
        }
        let blocks = std::mem::take(&mut self.refresh.blocks);
        (!blocks.is_empty()).then_some(Refresh::Blocks(blocks))
    }

    /// Apply every queued structural message from the table.
    pub(crate) fn sync_table(&mut self) -> usize {
        let messages = self.notifier.drain();
        let n = messages.len();
        for msg in messages {
            self.apply_message(msg);
        }
        self.sync_dimensions();
        n
    }

    fn apply_message(&mut self, msg: TableMessage) {
        debug!(?msg, "table changed");
        self.shift_axis(msg.axis, msg.pos, msg.delta());
    }

    /// Catch dimension changes the table did not report.
    fn sync_dimensions(&mut self) {
        let Some(t) = self.table.as_ref() else {
            return;
        };
        let (rows, cols) = t.read(|t| (t.number_rows(), t.number_cols()));
        let have_rows = self.rows.count();
        if rows != have_rows {
            warn!(have_rows, rows, "table row count drifted, resyncing");
            let pos = have_rows.min(rows);
            self.shift_axis(Axis::Row, pos, rows - have_rows);
        }
        let have_cols = self.cols.count();
        if cols != have_cols {
            warn!(have_cols, cols, "table column count drifted, resyncing");
            let pos = have_cols.min(cols);
            self.shift_axis(Axis::Col, pos, cols - have_cols);
        }
    }

    fn shift_axis(&mut self, axis: Axis, pos: i32, delta: i32) {
        if delta == 0 {
            return;
        }
        match axis {
            Axis::Row => {
                self.rows.insert_or_delete(pos, delta);
                self.attrs.update_rows(pos, delta);
                self.spans.update_rows(pos, delta);
            }
            Axis::Col => {
                self.cols.insert_or_delete(pos, delta);
                self.attrs.update_cols(pos, delta);
                self.spans.update_cols(pos, delta);
            }
        }
        let (rows, cols) = (self.rows.count(), self.cols.count());
        self.selection.set_dimensions(rows, cols);
        self.invalidate_attrs();
        self.refresh_all();
    }

    /// Drop the table and every table-dependent piece of state.
    fn release(&mut self) {
        self.editor.release();
        if let Some(mut old) = self.table.take() {
            old.write(|t| t.attach_notifier(None));
            debug!(owned = old.is_owned(), "table released");
        }
        self.notifier.drain();
        self.rows = AxisSizing::new(0, self.config.default_row_height, self.config.min_row_height);
        self.cols = AxisSizing::new(0, self.config.default_col_width, self.config.min_col_width);
        self.attrs.clear();
        self.spans.clear();
        self.selection.set_dimensions(0, 0);
        self.invalidate_attrs();
        self.refresh_all();
    }

    /// Cell rectangle of `coord` in content coordinates, covering its whole
    /// span. Labels give their strip of the label area with a negative
    /// offset on the label axis.
    pub(crate) fn cell_rect(&self, coord: Coord) -> Option<CellRect> {
        let (nrows, ncols) = (self.number_rows(), self.number_cols());
        let row_ok = coord.row == LABEL || (0..nrows).contains(&coord.row);
        let col_ok = coord.col == LABEL || (0..ncols).contains(&coord.col);
        if !row_ok || !col_ok {
            return None;
        }
        if coord.is_cell() {
            let block = self.spans.span_of(coord).unwrap_or_else(|| Block::single(coord));
            return Some(block_rect(&self.rows, &self.cols, block.top_left(), block.bottom_right()));
        }
        let (y, height) = if coord.row == LABEL {
            (-self.config.col_label_height, self.config.col_label_height)
        } else {
            (self.rows.start(coord.row), self.rows.size(coord.row))
        };
        let (x, width) = if coord.col == LABEL {
            (-self.config.row_label_width, self.config.row_label_width)
        } else {
            (self.cols.start(coord.col), self.cols.size(coord.col))
        };
        Some(CellRect { x, y, width, height })
    }
}

/// One view of a grid.
///
/// Every mutating call goes through the shared state, so the change is seen
/// by all views of the same grid.
pub struct Grid {
    shared: SharedGrid,
    detached: DetachQueue,
    id: ViewId,
    attached: bool,
    pub(crate) viewport: Viewport,
    pub(crate) cursor: Coord,
    /// Fixed corner of keyboard range selection.
    pub(crate) anchor: Coord,
    pub(crate) drag: Option<events::Drag>,
    cache: RefCell<AttrCache>,
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("id", &self.id)
            .field("attached", &self.attached)
            .field("viewport", &self.viewport)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Drop for Grid {
    fn drop(&mut self) {
        self.detach();
    }
}

impl Grid {
    /// New grid with a single view and no table.
    pub fn new(config: GridConfig) -> Self {
        let shared = Rc::new(RefCell::new(SharedGridState::new(config)));
        Self::bind(shared)
    }

    /// New grid bound to `table`.
    pub fn with_table(config: GridConfig, table: TableHandle) -> Self {
        let mut grid = Self::new(config);
        grid.set_table(table);
        grid
    }

    fn bind(shared: SharedGrid) -> Self {
        let (id, viewport, detached) = {
            let mut st = shared.borrow_mut();
            st.reap_detached();
            let id = st.new_view();
            let mut viewport = Viewport::default();
            viewport.row_label_width = st.config.row_label_width;
            viewport.col_label_height = st.config.col_label_height;
            (id, viewport, Rc::clone(&st.detached))
        };
        trace!(view = id.0, "view attached");
        Self {
            shared,
            detached,
            id,
            attached: true,
            viewport,
            cursor: Coord::new(0, 0),
            anchor: Coord::new(0, 0),
            drag: None,
            cache: RefCell::new(AttrCache::new()),
        }
    }

    /// Another view of the same grid.
    pub fn attach_view(&self) -> Grid {
        Self::bind(Rc::clone(&self.shared))
    }

    /// Unbind this view. The shared state is released with the last view.
    /// Calling it again is a no-op.
    ///
    /// When the shared state is borrowed elsewhere the detach is queued and
    /// completes on the next mutable access by any view.
    pub fn detach(&mut self) {
        if !std::mem::take(&mut self.attached) {
            return;
        }
        self.detached.borrow_mut().push(self.id);
        if !self.reap_detached() {
            warn!(view = self.id.0, "grid busy while detaching view, deferred");
        }
    }

    /// Apply queued detaches if the shared state is free.
    fn reap_detached(&self) -> bool {
        match self.shared.try_borrow_mut() {
            Ok(mut st) => {
                st.reap_detached();
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn view_id(&self) -> ViewId {
        self.id
    }

    pub fn view_count(&self) -> usize {
        self.reap_detached();
        self.state().view_count()
    }

    /// The shared state behind this view.
    pub fn shared(&self) -> &SharedGrid {
        &self.shared
    }

    /// Whether `other` views the same grid.
    pub fn same_grid(&self, other: &Grid) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub(crate) fn state(&self) -> Ref<'_, SharedGridState> {
        self.shared.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, SharedGridState> {
        let mut st = self.shared.borrow_mut();
        st.reap_detached();
        st
    }

    /// Deliver `event` with no borrow of the shared state held.
    pub(crate) fn emit(&self, event: &mut GridEvent) -> bool {
        let bus = self.state().events.clone();
        bus.emit(event)
    }

    pub(crate) fn send(&self, event: GridEvent) -> bool {
        let bus = self.state().events.clone();
        bus.send(event)
    }

    pub fn events(&self) -> EventBus {
        self.state().events.clone()
    }

    pub fn subscribe<L: GridListener + 'static>(&self, listener: L) -> ListenerId {
        self.events().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.events().unsubscribe(id);
    }

    pub fn config(&self) -> GridConfig {
        self.state().config.clone()
    }

    pub fn is_editable(&self) -> bool {
        self.state().config.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        if !editable {
            self.release_editor();
        }
        self.state_mut().config.editable = editable;
    }

    /// Host text metrics used for best sizes, wrapping and overflow.
    pub fn set_text_measure(&mut self, measure: Rc<dyn TextMeasure>) {
        let mut st = self.state_mut();
        st.measure = measure;
        st.refresh_all();
    }

    pub(crate) fn measure(&self) -> Rc<dyn TextMeasure> {
        Rc::clone(&self.state().measure)
    }

    // ----- table --------------------------------------------------------

    /// Bind `table`, replacing (and releasing) any previous one.
    ///
    /// Sizes, attributes, spans and the selection start over from the new
    /// table's dimensions. An active editor is dropped without saving.
    pub fn set_table(&mut self, mut table: TableHandle) {
        let mut st = self.state_mut();
        st.release();
        table.write(|t| t.attach_notifier(Some(st.notifier.clone())));
        let (rows, cols) = table.read(|t| (t.number_rows(), t.number_cols()));
        st.rows = AxisSizing::new(rows, st.config.default_row_height, st.config.min_row_height);
        st.cols = AxisSizing::new(cols, st.config.default_col_width, st.config.min_col_width);
        st.selection.set_dimensions(rows, cols);
        st.table = Some(table);
        debug!(rows, cols, "table attached");
        drop(st);
        self.cursor = Coord::new(0, 0);
        self.anchor = self.cursor;
        self.viewport.scroll_x = 0;
        self.viewport.scroll_y = 0;
    }

    /// Unbind and hand back the table.
    pub fn take_table(&mut self) -> Option<TableHandle> {
        let mut st = self.state_mut();
        st.editor.release();
        let mut table = st.table.take()?;
        table.write(|t| t.attach_notifier(None));
        drop(st);
        self.state_mut().release();
        Some(table)
    }

    pub fn has_table(&self) -> bool {
        self.state().has_table()
    }

    /// Read access to the bound table.
    pub fn read_table<R>(&self, f: impl FnOnce(&dyn Table) -> R) -> Option<R> {
        self.state().table.as_ref().map(|t| t.read(f))
    }

    /// Apply structural changes the table queued since the last call.
    ///
    /// Needed only when a shared table is edited behind the grid's back.
    pub fn sync_table(&mut self) -> usize {
        self.state_mut().sync_table()
    }

    pub fn number_rows(&self) -> i32 {
        self.state().number_rows()
    }

    pub fn number_cols(&self) -> i32 {
        self.state().number_cols()
    }

    // ----- values -------------------------------------------------------

    /// Raw table value; empty without a table or outside the grid.
    pub fn cell_value(&self, coord: Coord) -> String {
        let st = self.state();
        if st.check_cell(coord).is_err() {
            return String::new();
        }
        st.value(coord)
    }

    pub fn is_empty_cell(&self, coord: Coord) -> bool {
        self.state().is_empty_cell(coord)
    }

    /// Data type name of `coord` as the table reports it.
    pub fn type_name(&self, coord: Coord) -> Option<String> {
        self.state().type_name(coord)
    }

    /// Write `value` to the owner of `coord`.
    ///
    /// Sends a cancelable [`GridEvent::CellChanging`] first; subscribers may
    /// rewrite the new value. After the write a [`GridEvent::CellChanged`]
    /// follows; a veto there restores the old value. Returns whether the new
    /// value stuck.
    pub fn set_cell_value(&mut self, coord: Coord, value: &str) -> Result<bool> {
        let (owner, old) = {
            let mut st = self.state_mut();
            st.sync_table();
            st.check_cell(coord)?;
            let owner = st.spans.owner_of(coord);
            (owner, st.value(owner))
        };
        if old == value {
            return Ok(false);
        }
        let mut changing = GridEvent::CellChanging {
            coord: owner,
            old: old.clone(),
            new: value.to_string(),
        };
        if !self.emit(&mut changing) {
            debug!(row = owner.row, col = owner.col, "cell change vetoed");
            return Ok(false);
        }
        let GridEvent::CellChanging { new, .. } = changing else {
            return Ok(false);
        };
        self.state_mut().write_value(owner, &new);

        if !self.send(GridEvent::CellChanged {
            coord: owner,
            old: old.clone(),
        }) {
            debug!(row = owner.row, col = owner.col, "cell change reverted");
            self.state_mut().write_value(owner, &old);
            return Ok(false);
        }
        self.state_mut().refresh_block(Block::single(owner));
        Ok(true)
    }

    /// Clear every value, keeping dimensions and attributes.
    pub fn clear_values(&mut self) -> Result<()> {
        self.release_editor();
        let mut st = self.state_mut();
        let table = st.table.as_mut().ok_or(GridError::NotReady)?;
        table.write(|t| t.clear());
        st.refresh_all();
        Ok(())
    }

    // ----- labels -------------------------------------------------------

    /// Table label of `row`, or its 1-based number.
    pub fn row_label(&self, row: i32) -> String {
        self.state()
            .table
            .as_ref()
            .and_then(|t| t.read(|t| t.row_label(row)))
            .unwrap_or_else(|| cell_ref::row_label(row))
    }

    /// Table label of `col`, or its letters.
    pub fn col_label(&self, col: i32) -> String {
        self.state()
            .table
            .as_ref()
            .and_then(|t| t.read(|t| t.col_label(col)))
            .unwrap_or_else(|| cell_ref::col_label(col))
    }

    pub fn set_row_label(&mut self, row: i32, label: &str) -> Result<()> {
        let mut st = self.state_mut();
        st.check_cell(Coord::new(row, 0)).map_err(|_| GridError::invalid(row, LABEL))?;
        if let Some(t) = st.table.as_mut() {
            t.write(|t| t.set_row_label(row, label));
        }
        st.refresh_all();
        Ok(())
    }

    pub fn set_col_label(&mut self, col: i32, label: &str) -> Result<()> {
        let mut st = self.state_mut();
        st.check_cell(Coord::new(0, col)).map_err(|_| GridError::invalid(LABEL, col))?;
        if let Some(t) = st.table.as_mut() {
            t.write(|t| t.set_col_label(col, label));
        }
        st.refresh_all();
        Ok(())
    }

    // ----- structure ----------------------------------------------------

    pub fn insert_rows(&mut self, pos: i32, count: i32) -> Result<bool> {
        self.structural(Axis::Row, Structural::Insert, pos, count)
    }

    pub fn append_rows(&mut self, count: i32) -> Result<bool> {
        let pos = self.number_rows();
        self.structural(Axis::Row, Structural::Append, pos, count)
    }

    pub fn delete_rows(&mut self, pos: i32, count: i32) -> Result<bool> {
        self.structural(Axis::Row, Structural::Delete, pos, count)
    }

    pub fn insert_cols(&mut self, pos: i32, count: i32) -> Result<bool> {
        self.structural(Axis::Col, Structural::Insert, pos, count)
    }

    pub fn append_cols(&mut self, count: i32) -> Result<bool> {
        let pos = self.number_cols();
        self.structural(Axis::Col, Structural::Append, pos, count)
    }

    pub fn delete_cols(&mut self, pos: i32, count: i32) -> Result<bool> {
        self.structural(Axis::Col, Structural::Delete, pos, count)
    }

    /// Forward a structural edit to the table and apply what it reports.
    ///
    /// Inserts accept `pos` up to the current count; deletes need an
    /// existing `pos` and clamp `count` to the end.
    fn structural(&mut self, axis: Axis, op: Structural, pos: i32, count: i32) -> Result<bool> {
        let n = {
            let mut st = self.state_mut();
            st.sync_table();
            if !st.has_table() {
                return Err(GridError::NotReady);
            }
            match axis {
                Axis::Row => st.number_rows(),
                Axis::Col => st.number_cols(),
            }
        };
        let in_range = match op {
            Structural::Insert | Structural::Append => (0..=n).contains(&pos),
            Structural::Delete => (0..n).contains(&pos),
        };
        if !in_range {
            return Err(match axis {
                Axis::Row => GridError::invalid(pos, LABEL),
                Axis::Col => GridError::invalid(LABEL, pos),
            });
        }
        if count <= 0 {
            return Ok(false);
        }
        // The edited cell may move or vanish.
        let save = self.state().config.save_on_editor_switch;
        if !self.disable_edit(save) {
            warn!(?axis, pos, "structural change blocked by the active editor");
            return Err(GridError::Vetoed(EventKind::EditorDisabling));
        }

        let mut st = self.state_mut();
        let Some(table) = st.table.as_mut() else {
            return Err(GridError::NotReady);
        };
        let done = table.write(|t| match (axis, op) {
            (Axis::Row, Structural::Insert) => t.insert_rows(pos, count),
            (Axis::Row, Structural::Append) => t.append_rows(count),
            (Axis::Row, Structural::Delete) => t.delete_rows(pos, count),
            (Axis::Col, Structural::Insert) => t.insert_cols(pos, count),
            (Axis::Col, Structural::Append) => t.append_cols(count),
            (Axis::Col, Structural::Delete) => t.delete_cols(pos, count),
        });
        st.sync_table();
        let (rows, cols) = (st.number_rows(), st.number_cols());
        drop(st);
        self.clamp_cursor(rows, cols);
        Ok(done)
    }

    fn clamp_cursor(&mut self, rows: i32, cols: i32) {
        let clamp = |c: Coord| Coord::new(c.row.clamp(0, (rows - 1).max(0)), c.col.clamp(0, (cols - 1).max(0)));
        self.cursor = clamp(self.cursor);
        self.anchor = clamp(self.anchor);
    }

    // ----- sizing -------------------------------------------------------

    pub fn row_size(&self, row: i32) -> i32 {
        self.state().rows.size(row)
    }

    pub fn col_size(&self, col: i32) -> i32 {
        self.state().cols.size(col)
    }

    /// Set a row height. Values below the row's minimum are ignored.
    pub fn set_row_size(&mut self, row: i32, size: i32) -> bool {
        let changed = {
            let mut st = self.state_mut();
            let old = st.rows.size(row);
            let ok = st.rows.set_size(row, size) && old != size;
            if ok {
                st.refresh_all();
            }
            ok
        };
        if changed {
            self.send(GridEvent::RowSize { row, size });
        }
        changed
    }

    /// Set a column width. Values below the column's minimum are ignored.
    pub fn set_col_size(&mut self, col: i32, size: i32) -> bool {
        let changed = {
            let mut st = self.state_mut();
            let old = st.cols.size(col);
            let ok = st.cols.set_size(col, size) && old != size;
            if ok {
                st.refresh_all();
            }
            ok
        };
        if changed {
            self.send(GridEvent::ColSize { col, size });
        }
        changed
    }

    pub fn set_default_row_size(&mut self, size: i32, reset_existing: bool) {
        let mut st = self.state_mut();
        st.rows.set_default_size(size, reset_existing);
        st.refresh_all();
    }

    pub fn set_default_col_size(&mut self, size: i32, reset_existing: bool) {
        let mut st = self.state_mut();
        st.cols.set_default_size(size, reset_existing);
        st.refresh_all();
    }

    pub fn set_row_min_size(&mut self, row: i32, min: i32) -> bool {
        self.state_mut().rows.set_min_size(row, min)
    }

    pub fn set_col_min_size(&mut self, col: i32, min: i32) -> bool {
        self.state_mut().cols.set_min_size(col, min)
    }

    /// Row at content offset `y`; see [`AxisSizing::index_at`].
    pub fn row_at(&self, y: i32, clip: bool) -> i32 {
        self.state().rows.index_at(y, clip)
    }

    /// Column at content offset `x`; see [`AxisSizing::index_at`].
    pub fn col_at(&self, x: i32, clip: bool) -> i32 {
        self.state().cols.index_at(x, clip)
    }

    /// Content rectangle of `coord`, spanning its merged block.
    pub fn cell_rect(&self, coord: Coord) -> Option<CellRect> {
        self.state().cell_rect(coord)
    }

    /// Client rectangle of `coord` in this view.
    pub fn client_cell_rect(&self, coord: Coord) -> Option<CellRect> {
        let r = self.cell_rect(coord)?;
        let (x, y) = self.content_to_client(coord, r.x, r.y);
        Some(CellRect { x, y, ..r })
    }

    /// Labels do not scroll along their own axis.
    fn content_to_client(&self, coord: Coord, x: i32, y: i32) -> (i32, i32) {
        let (sx, sy) = self.viewport.to_screen(x, y);
        let sx = if coord.col == LABEL { x + self.viewport.row_label_width } else { sx };
        let sy = if coord.row == LABEL { y + self.viewport.col_label_height } else { sy };
        (sx, sy)
    }

    /// Grid coordinate under client point `(x, y)`: a cell, a row or column
    /// label (`-1` on the label axis) or the corner.
    pub fn coord_at(&self, x: i32, y: i32) -> Option<Coord> {
        if x < 0 || y < 0 || x >= self.viewport.width || y >= self.viewport.height {
            return None;
        }
        let (cx, cy) = self.viewport.to_content(x, y);
        let st = self.state();
        let col = if x < self.viewport.row_label_width {
            LABEL
        } else {
            match st.cols.index_at(cx, false) {
                LABEL => return None,
                c => c,
            }
        };
        let row = if y < self.viewport.col_label_height {
            LABEL
        } else {
            match st.rows.index_at(cy, false) {
                LABEL => return None,
                r => r,
            }
        };
        Some(Coord::new(row, col))
    }

    // ----- spans --------------------------------------------------------

    /// Merge `block` into one cell owned by its top-left; a 1x1 block
    /// removes the span owned there.
    pub fn set_span(&mut self, block: Block) -> Result<()> {
        let mut st = self.state_mut();
        if !st.has_table() {
            return Err(GridError::NotReady);
        }
        let (rows, cols) = (st.number_rows(), st.number_cols());
        let before = st.spans.span_of(block.top_left());
        st.spans.set_span(block, rows, cols)?;
        if let Some(b) = before {
            st.refresh_block(b);
        }
        st.refresh_block(block);
        Ok(())
    }

    pub fn span_of(&self, coord: Coord) -> Option<Block> {
        self.state().spans.span_of(coord)
    }

    pub fn owner_of(&self, coord: Coord) -> Coord {
        self.state().spans.owner_of(coord)
    }

    // ----- batching and refresh ----------------------------------------

    /// Hold repaints until the matching [`Grid::end_batch`]. Nests.
    pub fn begin_batch(&mut self) {
        let mut st = self.state_mut();
        st.batch_depth += 1;
        st.invalidate_attrs();
    }

    pub fn end_batch(&mut self) {
        let mut st = self.state_mut();
        st.batch_depth = st.batch_depth.saturating_sub(1);
    }

    pub fn batch_depth(&self) -> u32 {
        self.state().batch_depth
    }

    /// Repaint area accumulated since the last call. `None` while batching
    /// or when nothing changed.
    pub fn take_refresh(&self) -> Option<Refresh> {
        self.state_mut().take_refresh()
    }

    /// Client rectangles of `refresh` in this view.
    pub fn refresh_rects(&self, refresh: &Refresh) -> Vec<SelectionRect> {
        match refresh {
            Refresh::All => vec![SelectionRect {
                x: 0,
                y: 0,
                w: self.viewport.width,
                h: self.viewport.height,
                draw_top: true,
                draw_bottom: true,
                draw_left: true,
                draw_right: true,
            }],
            Refresh::Blocks(blocks) => {
                let st = self.state();
                selection_rects(blocks, &st.rows, &st.cols, &self.viewport)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Structural {
    Insert,
    Append,
    Delete,
}
