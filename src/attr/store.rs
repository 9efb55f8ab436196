//! Sparse attribute maps and `Any` resolution.

use std::collections::HashMap;

use tracing::trace;

use super::{AttrKind, CellAttr};
use crate::types::{Axis, Coord};

/// Cell, row, column and label attributes of one grid.
///
/// Keys always lie inside the grid: structural edits re-key every map the
/// same way [`crate::layout::AxisSizing::insert_or_delete`] shifts sizes.
#[derive(Debug, Clone, Default)]
pub struct AttrStore {
    cells: HashMap<Coord, CellAttr>,
    rows: HashMap<i32, CellAttr>,
    cols: HashMap<i32, CellAttr>,
    row_labels: HashMap<i32, CellAttr>,
    col_labels: HashMap<i32, CellAttr>,
}

/// Scope closeness used to order attributes of equal level.
fn closeness(kind: AttrKind) -> i32 {
    match kind {
        AttrKind::Cell => 2,
        AttrKind::Row => 1,
        _ => 0,
    }
}

impl AttrStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
            && self.rows.is_empty()
            && self.cols.is_empty()
            && self.row_labels.is_empty()
            && self.col_labels.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Store (`Some`) or remove (`None`) the attribute of `kind` at `coord`.
    ///
    /// Label coordinates go to the label maps whatever `kind` says. `Any` is
    /// stored as a cell attribute; the stored copy is stamped with its real
    /// scope so a merged result is never persisted as `Any`.
    pub fn set(&mut self, coord: Coord, attr: Option<CellAttr>, kind: AttrKind) {
        let attr = attr.map(|mut a| {
            let stored = match kind {
                AttrKind::Row | AttrKind::Col => kind,
                _ => AttrKind::Cell,
            };
            a.set_kind(stored);
            a
        });

        if coord.is_corner() {
            return;
        }
        if coord.is_row_label() {
            Self::put(&mut self.row_labels, coord.row, attr);
            return;
        }
        if coord.is_col_label() {
            Self::put(&mut self.col_labels, coord.col, attr);
            return;
        }
        match kind {
            AttrKind::Row => Self::put(&mut self.rows, coord.row, attr),
            AttrKind::Col => Self::put(&mut self.cols, coord.col, attr),
            _ => Self::put(&mut self.cells, coord, attr),
        }
    }

    fn put<K: std::hash::Hash + Eq>(map: &mut HashMap<K, CellAttr>, key: K, attr: Option<CellAttr>) {
        match attr {
            Some(a) => {
                map.insert(key, a);
            }
            None => {
                map.remove(&key);
            }
        }
    }

    /// The stored attribute of one scope, without merging.
    pub fn get(&self, coord: Coord, kind: AttrKind) -> Option<&CellAttr> {
        if coord.is_row_label() {
            return self.row_labels.get(&coord.row);
        }
        if coord.is_col_label() {
            return self.col_labels.get(&coord.col);
        }
        if !coord.is_cell() {
            return None;
        }
        match kind {
            AttrKind::Row => self.rows.get(&coord.row),
            AttrKind::Col => self.cols.get(&coord.col),
            AttrKind::Cell => self.cells.get(&coord),
            AttrKind::Any | AttrKind::Default => None,
        }
    }

    /// Resolve the attribute of `kind` at `coord`.
    ///
    /// For [`AttrKind::Any`] the cell, row and column attributes are merged:
    /// ordered by `(level, closeness)` with cell closer than row closer than
    /// column, the lowest is cloned and each higher one overwrites the fields
    /// it sets. The result is stamped `Any`.
    pub fn resolve(&self, coord: Coord, kind: AttrKind) -> Option<CellAttr> {
        if kind != AttrKind::Any || !coord.is_cell() {
            return self.get(coord, kind).cloned();
        }

        let mut found: Vec<&CellAttr> = [AttrKind::Col, AttrKind::Row, AttrKind::Cell]
            .into_iter()
            .filter_map(|k| self.get(coord, k))
            .collect();
        match found.len() {
            0 => return None,
            1 => return found.pop().cloned(),
            _ => {}
        }
        found.sort_by_key(|a| (a.level(), closeness(a.kind())));

        let mut iter = found.into_iter();
        let mut merged = iter.next()?.clone();
        for higher in iter {
            merged.update_with(higher);
        }
        merged.set_kind(AttrKind::Any);
        trace!(row = coord.row, col = coord.col, "merged attribute");
        Some(merged)
    }

    /// Re-key after inserting (`delta > 0`) or deleting rows at `pos`.
    pub fn update_rows(&mut self, pos: i32, delta: i32) {
        self.update_axis(Axis::Row, pos, delta);
    }

    /// Re-key after inserting (`delta > 0`) or deleting columns at `pos`.
    pub fn update_cols(&mut self, pos: i32, delta: i32) {
        self.update_axis(Axis::Col, pos, delta);
    }

    fn update_axis(&mut self, axis: Axis, pos: i32, delta: i32) {
        if delta == 0 {
            return;
        }
        let cells = std::mem::take(&mut self.cells);
        self.cells = cells
            .into_iter()
            .filter_map(|(c, a)| {
                let key = match axis {
                    Axis::Row => c.row,
                    Axis::Col => c.col,
                };
                let shifted = shift_key(key, pos, delta)?;
                let coord = match axis {
                    Axis::Row => Coord::new(shifted, c.col),
                    Axis::Col => Coord::new(c.row, shifted),
                };
                Some((coord, a))
            })
            .collect();

        let (line, labels) = match axis {
            Axis::Row => (&mut self.rows, &mut self.row_labels),
            Axis::Col => (&mut self.cols, &mut self.col_labels),
        };
        for map in [line, labels] {
            let old = std::mem::take(map);
            *map = old
                .into_iter()
                .filter_map(|(k, a)| Some((shift_key(k, pos, delta)?, a)))
                .collect();
        }
    }
}

/// New index of `key` after `delta` entries were inserted/removed at `pos`.
fn shift_key(key: i32, pos: i32, delta: i32) -> Option<i32> {
    if key < pos {
        Some(key)
    } else if delta < 0 && key < pos - delta {
        None
    } else {
        Some(key + delta)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn colored(c: &str) -> CellAttr {
        let mut a = CellAttr::new();
        a.set_back_color(c);
        a
    }

    #[test]
    fn test_closest_scope_wins_at_equal_level() {
        let mut store = AttrStore::new();
        let at = Coord::new(2, 3);
        store.set(at, Some(colored("#000001")), AttrKind::Col);
        store.set(at, Some(colored("#000002")), AttrKind::Row);
        assert_eq!(
            store.resolve(at, AttrKind::Any).unwrap().back_color().as_deref(),
            Some("#000002")
        );
        store.set(at, Some(colored("#000003")), AttrKind::Cell);
        let any = store.resolve(at, AttrKind::Any).unwrap();
        assert_eq!(any.back_color().as_deref(), Some("#000003"));
        assert_eq!(any.kind(), AttrKind::Any);
    }

    #[test]
    fn test_level_overrides_proximity() {
        let mut store = AttrStore::new();
        let at = Coord::new(0, 0);
        let mut col = colored("#00000C");
        col.set_level(1);
        store.set(at, Some(col), AttrKind::Col);
        store.set(at, Some(colored("#0000CE")), AttrKind::Cell);
        assert_eq!(
            store.resolve(at, AttrKind::Any).unwrap().back_color().as_deref(),
            Some("#00000C")
        );
    }

    #[test]
    fn test_merge_keeps_fields_from_lower_scopes() {
        let mut store = AttrStore::new();
        let at = Coord::new(1, 1);
        let mut row = CellAttr::new();
        row.set_text_color("#FF0000").set_back_color("#EEEEEE");
        store.set(at, Some(row), AttrKind::Row);
        store.set(at, Some(colored("#00FF00")), AttrKind::Cell);
        let any = store.resolve(at, AttrKind::Any).unwrap();
        assert_eq!(any.text_color().as_deref(), Some("#FF0000"));
        assert_eq!(any.back_color().as_deref(), Some("#00FF00"));
        // stored attributes are untouched by the merge
        assert_eq!(store.get(at, AttrKind::Row).unwrap().kind(), AttrKind::Row);
        assert_eq!(
            store.get(at, AttrKind::Row).unwrap().back_color().as_deref(),
            Some("#EEEEEE")
        );
    }

    #[test]
    fn test_any_is_never_stored() {
        let mut store = AttrStore::new();
        let mut a = colored("#123456");
        a.set_kind(AttrKind::Any);
        store.set(Coord::new(0, 0), Some(a), AttrKind::Any);
        assert_eq!(
            store.get(Coord::new(0, 0), AttrKind::Cell).unwrap().kind(),
            AttrKind::Cell
        );
    }

    #[test]
    fn test_update_rows_rekeys_and_drops() {
        let mut store = AttrStore::new();
        store.set(Coord::new(1, 0), Some(colored("#000001")), AttrKind::Cell);
        store.set(Coord::new(3, 0), Some(colored("#000003")), AttrKind::Cell);
        store.set(Coord::new(5, 0), Some(colored("#000005")), AttrKind::Row);
        store.set(Coord::new(4, -1), Some(colored("#0000AA")), AttrKind::Cell);

        store.update_rows(2, -2);
        assert!(store.get(Coord::new(1, 0), AttrKind::Cell).is_some());
        assert!(store.get(Coord::new(3, 0), AttrKind::Cell).is_none());
        assert!(store.get(Coord::new(3, 0), AttrKind::Row).is_some());
        assert!(store.get(Coord::new(2, -1), AttrKind::Cell).is_some());

        store.update_rows(0, 1);
        assert!(store.get(Coord::new(2, 0), AttrKind::Cell).is_some());
        assert!(store.get(Coord::new(4, 0), AttrKind::Row).is_some());
    }

    #[test]
    fn test_label_maps() {
        let mut store = AttrStore::new();
        store.set(Coord::new(-1, 2), Some(colored("#ABCDEF")), AttrKind::Col);
        assert!(store.get(Coord::new(-1, 2), AttrKind::Cell).is_some());
        assert!(store.get(Coord::new(0, 2), AttrKind::Col).is_none());
        store.update_cols(0, -1);
        assert!(store.get(Coord::new(-1, 1), AttrKind::Any).is_some());
    }
}
