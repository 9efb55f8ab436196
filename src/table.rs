//! Table abstraction: the external data source behind a grid.
//!
//! A table owns cell values and dimensions. Structural edits (insert, append,
//! delete) report back to the grid through a [`TableNotifier`]; that queue is
//! the grid's only inbound channel for structural changes.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::registry::GRID_VALUE_STRING;
use crate::types::{to_i32, to_index, Axis, Coord};

/// What a structural edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableChange {
    Inserted,
    Appended,
    Deleted,
}

/// Structural change reported by a table: `count` entries at `pos` on `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMessage {
    pub axis: Axis,
    pub change: TableChange,
    pub pos: i32,
    pub count: i32,
}

impl TableMessage {
    /// Signed size delta as the sizing and attribute maps expect it.
    pub fn delta(&self) -> i32 {
        match self.change {
            TableChange::Inserted | TableChange::Appended => self.count,
            TableChange::Deleted => -self.count,
        }
    }
}

/// Queue of structural messages shared between a table and its grid.
#[derive(Debug, Clone, Default)]
pub struct TableNotifier(Rc<RefCell<VecDeque<TableMessage>>>);

impl TableNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, msg: TableMessage) {
        self.0.borrow_mut().push_back(msg);
    }

    pub fn drain(&self) -> Vec<TableMessage> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// Data source consumed by the grid.
///
/// Implementations must call [`TableNotifier::notify`] on every successful
/// structural edit once a notifier is attached.
pub trait Table {
    fn number_rows(&self) -> i32;
    fn number_cols(&self) -> i32;

    fn value(&self, coord: Coord) -> String;
    fn set_value(&mut self, coord: Coord, value: &str);

    /// Data type name used to pick a renderer and editor.
    fn type_name(&self, _coord: Coord) -> String {
        GRID_VALUE_STRING.to_string()
    }

    fn is_empty_cell(&self, coord: Coord) -> bool {
        self.value(coord).is_empty()
    }

    fn insert_rows(&mut self, pos: i32, count: i32) -> bool;
    fn append_rows(&mut self, count: i32) -> bool;
    fn delete_rows(&mut self, pos: i32, count: i32) -> bool;
    fn insert_cols(&mut self, pos: i32, count: i32) -> bool;
    fn append_cols(&mut self, count: i32) -> bool;
    fn delete_cols(&mut self, pos: i32, count: i32) -> bool;

    /// Clear every value, keeping dimensions.
    fn clear(&mut self);

    /// Label override; `None` falls back to the grid's default labels.
    fn row_label(&self, _row: i32) -> Option<String> {
        None
    }
    fn col_label(&self, _col: i32) -> Option<String> {
        None
    }
    fn set_row_label(&mut self, _row: i32, _label: &str) {}
    fn set_col_label(&mut self, _col: i32, _label: &str) {}

    fn attach_notifier(&mut self, notifier: Option<TableNotifier>);
}

/// In-memory table of strings.
#[derive(Debug, Default)]
pub struct StringTable {
    data: Vec<Vec<String>>,
    cols: i32,
    col_types: HashMap<i32, String>,
    row_labels: HashMap<i32, String>,
    col_labels: HashMap<i32, String>,
    notifier: Option<TableNotifier>,
}

impl StringTable {
    pub fn new(rows: i32, cols: i32) -> Self {
        let cols = cols.max(0);
        let width = to_index(cols).unwrap_or(0);
        Self {
            data: vec![vec![String::new(); width]; to_index(rows).unwrap_or(0)],
            cols,
            ..Self::default()
        }
    }

    /// Build from rows of values; the widest row sets the column count.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut data: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        let width = data.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut data {
            row.resize(width, String::new());
        }
        Self {
            data,
            cols: to_i32(width),
            ..Self::default()
        }
    }

    /// Declare the data type of every cell in `col`.
    pub fn set_col_type(&mut self, col: i32, type_name: &str) {
        self.col_types.insert(col, type_name.to_string());
    }

    fn cell(&self, coord: Coord) -> Option<&String> {
        self.data
            .get(to_index(coord.row)?)?
            .get(to_index(coord.col)?)
    }

    fn notify(&self, axis: Axis, change: TableChange, pos: i32, count: i32) {
        if let Some(n) = &self.notifier {
            n.notify(TableMessage {
                axis,
                change,
                pos,
                count,
            });
        }
    }

    fn shift_map<V>(map: &mut HashMap<i32, V>, pos: i32, delta: i32) {
        let old = std::mem::take(map);
        *map = old
            .into_iter()
            .filter_map(|(k, v)| {
                if k < pos {
                    Some((k, v))
                } else if delta < 0 && k < pos - delta {
                    None
                } else {
                    Some((k + delta, v))
                }
            })
            .collect();
    }
}

impl Table for StringTable {
    fn number_rows(&self) -> i32 {
        to_i32(self.data.len())
    }

    fn number_cols(&self) -> i32 {
        self.cols
    }

    fn value(&self, coord: Coord) -> String {
        self.cell(coord).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, coord: Coord, value: &str) {
        let (Some(r), Some(c)) = (to_index(coord.row), to_index(coord.col)) else {
            return;
        };
        if let Some(slot) = self.data.get_mut(r).and_then(|row| row.get_mut(c)) {
            *slot = value.to_string();
        }
    }

    fn type_name(&self, coord: Coord) -> String {
        self.col_types
            .get(&coord.col)
            .cloned()
            .unwrap_or_else(|| GRID_VALUE_STRING.to_string())
    }

    fn is_empty_cell(&self, coord: Coord) -> bool {
        self.cell(coord).map_or(true, String::is_empty)
    }

    fn insert_rows(&mut self, pos: i32, count: i32) -> bool {
        let rows = self.number_rows();
        if pos < 0 || pos > rows || count <= 0 {
            return false;
        }
        let (Some(at), Some(n), Some(width)) = (to_index(pos), to_index(count), to_index(self.cols))
        else {
            return false;
        };
        let fill = std::iter::repeat_with(|| vec![String::new(); width]).take(n);
        self.data.splice(at..at, fill);
        Self::shift_map(&mut self.row_labels, pos, count);
        self.notify(Axis::Row, TableChange::Inserted, pos, count);
        true
    }

    fn append_rows(&mut self, count: i32) -> bool {
        let (Some(n), Some(width)) = (to_index(count), to_index(self.cols)) else {
            return false;
        };
        if n == 0 {
            return false;
        }
        let pos = self.number_rows();
        self.data
            .extend(std::iter::repeat_with(|| vec![String::new(); width]).take(n));
        self.notify(Axis::Row, TableChange::Appended, pos, count);
        true
    }

    fn delete_rows(&mut self, pos: i32, count: i32) -> bool {
        let rows = self.number_rows();
        if pos < 0 || pos >= rows || count <= 0 {
            return false;
        }
        let count = count.min(rows - pos);
        let (Some(at), Some(n)) = (to_index(pos), to_index(count)) else {
            return false;
        };
        self.data.drain(at..at + n);
        Self::shift_map(&mut self.row_labels, pos, -count);
        self.notify(Axis::Row, TableChange::Deleted, pos, count);
        true
    }

    fn insert_cols(&mut self, pos: i32, count: i32) -> bool {
        if pos < 0 || pos > self.cols || count <= 0 {
            return false;
        }
        let (Some(at), Some(n)) = (to_index(pos), to_index(count)) else {
            return false;
        };
        for row in &mut self.data {
            row.splice(at..at, std::iter::repeat_with(String::new).take(n));
        }
        self.cols += count;
        Self::shift_map(&mut self.col_labels, pos, count);
        Self::shift_map(&mut self.col_types, pos, count);
        self.notify(Axis::Col, TableChange::Inserted, pos, count);
        true
    }

    fn append_cols(&mut self, count: i32) -> bool {
        let Some(n) = to_index(count).filter(|n| *n > 0) else {
            return false;
        };
        let pos = self.cols;
        for row in &mut self.data {
            row.extend(std::iter::repeat_with(String::new).take(n));
        }
        self.cols += count;
        self.notify(Axis::Col, TableChange::Appended, pos, count);
        true
    }

    fn delete_cols(&mut self, pos: i32, count: i32) -> bool {
        if pos < 0 || pos >= self.cols || count <= 0 {
            return false;
        }
        let count = count.min(self.cols - pos);
        let (Some(at), Some(n)) = (to_index(pos), to_index(count)) else {
            return false;
        };
        for row in &mut self.data {
            let end = (at + n).min(row.len());
            row.drain(at.min(end)..end);
        }
        self.cols -= count;
        Self::shift_map(&mut self.col_labels, pos, -count);
        Self::shift_map(&mut self.col_types, pos, -count);
        self.notify(Axis::Col, TableChange::Deleted, pos, count);
        true
    }

    fn clear(&mut self) {
        for row in &mut self.data {
            for v in row.iter_mut() {
                v.clear();
            }
        }
    }

    fn row_label(&self, row: i32) -> Option<String> {
        self.row_labels.get(&row).cloned()
    }

    fn col_label(&self, col: i32) -> Option<String> {
        self.col_labels.get(&col).cloned()
    }

    fn set_row_label(&mut self, row: i32, label: &str) {
        self.row_labels.insert(row, label.to_string());
    }

    fn set_col_label(&mut self, col: i32, label: &str) {
        self.col_labels.insert(col, label.to_string());
    }

    fn attach_notifier(&mut self, notifier: Option<TableNotifier>) {
        self.notifier = notifier;
    }
}
