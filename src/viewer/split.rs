//! Up to four linked views of one grid in a 2x2 arrangement.
//!
//! A vertical sash puts panes side by side, a horizontal sash stacks them.
//! Panes in the same column scroll together horizontally; panes in the same
//! row scroll together vertically. Right panes hide the row labels and
//! bottom panes hide the column labels.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Grid, ViewId};
use crate::error::{GridError, Result};
use crate::events::GridEvent;
use crate::layout::CellRect;

/// Thickness of a sash in pixels.
pub const SASH_SIZE: i32 = 4;
/// Smallest extent a pane may be dragged to.
pub const MIN_PANE_SIZE: i32 = 32;

/// Direction of the sash line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SashOrientation {
    /// Panes above and below.
    Horizontal,
    /// Panes left and right.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneId {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PaneId {
    pub const ALL: [PaneId; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    pub fn is_right(self) -> bool {
        matches!(self, Self::TopRight | Self::BottomRight)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomRight)
    }
}

#[derive(Debug)]
struct Pane {
    grid: Grid,
    can_split_horizontal: bool,
    can_split_vertical: bool,
}

impl Pane {
    fn new(grid: Grid) -> Self {
        Self {
            grid,
            can_split_horizontal: true,
            can_split_vertical: true,
        }
    }

    fn can_split(&self, orientation: SashOrientation) -> bool {
        match orientation {
            SashOrientation::Horizontal => self.can_split_horizontal,
            SashOrientation::Vertical => self.can_split_vertical,
        }
    }
}

#[derive(Debug)]
pub struct SplitLayout {
    panes: BTreeMap<PaneId, Pane>,
    width: i32,
    height: i32,
    /// x of the vertical sash.
    vertical: Option<i32>,
    /// y of the horizontal sash.
    horizontal: Option<i32>,
    dragging: Option<SashOrientation>,
    label_sizes: (i32, i32),
}

impl SplitLayout {
    /// Layout of `width` x `height` with `grid` as the only pane.
    pub fn new(grid: Grid, width: i32, height: i32) -> Self {
        let label_sizes = {
            let vp = grid.viewport();
            (vp.row_label_width, vp.col_label_height)
        };
        let mut panes = BTreeMap::new();
        panes.insert(PaneId::TopLeft, Pane::new(grid));
        let mut layout = Self {
            panes,
            width: width.max(0),
            height: height.max(0),
            vertical: None,
            horizontal: None,
            dragging: None,
            label_sizes,
        };
        layout.apply_layout();
        layout
    }

    pub fn pane(&self, id: PaneId) -> Option<&Grid> {
        self.panes.get(&id).map(|p| &p.grid)
    }

    pub fn pane_mut(&mut self, id: PaneId) -> Option<&mut Grid> {
        self.panes.get_mut(&id).map(|p| &mut p.grid)
    }

    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.panes.keys().copied().collect()
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    pub fn is_split(&self, orientation: SashOrientation) -> bool {
        self.sash_position(orientation).is_some()
    }

    pub fn sash_position(&self, orientation: SashOrientation) -> Option<i32> {
        match orientation {
            SashOrientation::Horizontal => self.horizontal,
            SashOrientation::Vertical => self.vertical,
        }
    }

    /// Whether `pane` may still be split along `orientation`.
    pub fn can_split(&self, pane: PaneId, orientation: SashOrientation) -> bool {
        !self.is_split(orientation) && self.panes.get(&pane).is_some_and(|p| p.can_split(orientation))
    }

    fn extent(&self, orientation: SashOrientation) -> i32 {
        match orientation {
            SashOrientation::Horizontal => self.height,
            SashOrientation::Vertical => self.width,
        }
    }

    fn clamp_sash(&self, orientation: SashOrientation, pos: i32) -> i32 {
        let hi = self.extent(orientation) - SASH_SIZE - MIN_PANE_SIZE;
        pos.min(hi).max(MIN_PANE_SIZE)
    }

    fn set_sash(&mut self, orientation: SashOrientation, pos: Option<i32>) {
        match orientation {
            SashOrientation::Horizontal => self.horizontal = pos,
            SashOrientation::Vertical => self.vertical = pos,
        }
    }

    fn top_left(&self) -> Result<&Grid> {
        self.pane(PaneId::TopLeft)
            .ok_or_else(|| GridError::ModeConflict("split layout has no panes".to_string()))
    }

    /// New view of the grid for `id`, scrolled like `source`.
    fn spawn(&self, id: PaneId, source: PaneId) -> Result<Pane> {
        let from = self
            .pane(source)
            .ok_or_else(|| GridError::ModeConflict(format!("{source:?} pane missing")))?;
        let mut grid = from.attach_view();
        let (x, y) = from.scroll_position();
        let (row_labels, col_labels) = self.label_sizes;
        grid.set_label_sizes(
            if id.is_right() { 0 } else { row_labels },
            if id.is_bottom() { 0 } else { col_labels },
        );
        grid.scroll_to(x, y);
        Ok(Pane::new(grid))
    }

    /// Split along `orientation` with the sash at `pos`.
    ///
    /// Creates the missing pane(s) on the far side of the sash, bound to the
    /// same grid. Once both axes are split the diagonal pane is created too.
    pub fn split(&mut self, orientation: SashOrientation, pos: i32) -> Result<()> {
        if !self.can_split(PaneId::TopLeft, orientation) {
            return Err(GridError::ModeConflict(format!("already split {orientation:?}")));
        }
        let pos = self.clamp_sash(orientation, pos);
        let other_split = match orientation {
            SashOrientation::Vertical => self.horizontal.is_some(),
            SashOrientation::Horizontal => self.vertical.is_some(),
        };
        let mut created = Vec::new();
        match orientation {
            SashOrientation::Vertical => {
                created.push((PaneId::TopRight, self.spawn(PaneId::TopRight, PaneId::TopLeft)?));
                if other_split {
                    created.push((PaneId::BottomRight, self.spawn(PaneId::BottomRight, PaneId::BottomLeft)?));
                }
            }
            SashOrientation::Horizontal => {
                created.push((PaneId::BottomLeft, self.spawn(PaneId::BottomLeft, PaneId::TopLeft)?));
                if other_split {
                    created.push((PaneId::BottomRight, self.spawn(PaneId::BottomRight, PaneId::TopRight)?));
                }
            }
        }
        for (id, mut pane) in created {
            match orientation {
                SashOrientation::Horizontal => pane.can_split_horizontal = false,
                SashOrientation::Vertical => pane.can_split_vertical = false,
            }
            if id == PaneId::BottomRight {
                pane.can_split_horizontal = false;
                pane.can_split_vertical = false;
            }
            self.panes.insert(id, pane);
        }
        self.set_sash(orientation, Some(pos));
        self.apply_layout();
        debug!(?orientation, pos, panes = self.panes.len(), "split");
        self.top_left()?.send(GridEvent::SplitChanged {
            orientation,
            position: pos,
        });
        Ok(())
    }

    /// Remove the pane(s) on the far side of the `orientation` sash.
    ///
    /// With `keep_scroll` the removed panes' offset along the split axis is
    /// copied into the panes that stay. Returns the removed views.
    pub fn unsplit(&mut self, orientation: SashOrientation, keep_scroll: bool) -> Vec<ViewId> {
        if !self.is_split(orientation) {
            return Vec::new();
        }
        let pairs = match orientation {
            SashOrientation::Vertical => [
                (PaneId::TopRight, PaneId::TopLeft),
                (PaneId::BottomRight, PaneId::BottomLeft),
            ],
            SashOrientation::Horizontal => [
                (PaneId::BottomLeft, PaneId::TopLeft),
                (PaneId::BottomRight, PaneId::TopRight),
            ],
        };
        let mut removed = Vec::new();
        for (gone, stays) in pairs {
            let Some(pane) = self.panes.remove(&gone) else {
                continue;
            };
            removed.push(pane.grid.view_id());
            if keep_scroll {
                let (x, y) = pane.grid.scroll_position();
                if let Some(keep) = self.pane_mut(stays) {
                    let (kx, ky) = keep.scroll_position();
                    match orientation {
                        SashOrientation::Vertical => keep.scroll_to(x, ky),
                        SashOrientation::Horizontal => keep.scroll_to(kx, y),
                    };
                }
            }
        }
        if self.dragging == Some(orientation) {
            self.dragging = None;
        }
        self.set_sash(orientation, None);
        self.apply_layout();
        debug!(?orientation, removed = removed.len(), "unsplit");
        if let Ok(grid) = self.top_left() {
            grid.send(GridEvent::Unsplit {
                orientation,
                removed: removed.clone(),
            });
        }
        removed
    }

    /// Client rectangle of `pane`.
    pub fn pane_rect(&self, pane: PaneId) -> Option<CellRect> {
        if !self.panes.contains_key(&pane) {
            return None;
        }
        let (x, width) = match (self.vertical, pane.is_right()) {
            (None, _) => (0, self.width),
            (Some(v), false) => (0, v),
            (Some(v), true) => (v + SASH_SIZE, (self.width - v - SASH_SIZE).max(0)),
        };
        let (y, height) = match (self.horizontal, pane.is_bottom()) {
            (None, _) => (0, self.height),
            (Some(h), false) => (0, h),
            (Some(h), true) => (h + SASH_SIZE, (self.height - h - SASH_SIZE).max(0)),
        };
        Some(CellRect { x, y, width, height })
    }

    /// Sash under client point `(x, y)`.
    pub fn sash_at(&self, x: i32, y: i32) -> Option<SashOrientation> {
        let on = |sash: Option<i32>, p: i32| sash.is_some_and(|s| p >= s && p < s + SASH_SIZE);
        if on(self.vertical, x) {
            Some(SashOrientation::Vertical)
        } else if on(self.horizontal, y) {
            Some(SashOrientation::Horizontal)
        } else {
            None
        }
    }

    fn apply_layout(&mut self) {
        let rects: Vec<(PaneId, CellRect)> = PaneId::ALL
            .into_iter()
            .filter_map(|id| self.pane_rect(id).map(|r| (id, r)))
            .collect();
        for (id, r) in rects {
            if let Some(grid) = self.pane_mut(id) {
                grid.set_client_size(r.width, r.height);
            }
        }
    }

    /// New overall size. Sashes are kept inside the new bounds.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.vertical = self.vertical.map(|v| self.clamp_sash(SashOrientation::Vertical, v));
        self.horizontal = self.horizontal.map(|h| self.clamp_sash(SashOrientation::Horizontal, h));
        self.apply_layout();
    }

    pub fn begin_sash_drag(&mut self, orientation: SashOrientation) -> bool {
        if !self.is_split(orientation) {
            return false;
        }
        self.dragging = Some(orientation);
        true
    }

    /// Move the dragged sash towards `pos`.
    ///
    /// Subscribers see a cancelable [`GridEvent::SplitChanging`] and may
    /// override the position. Returns the applied position, `None` when
    /// vetoed or not dragging.
    pub fn drag_sash(&mut self, pos: i32) -> Option<i32> {
        let orientation = self.dragging?;
        let mut event = GridEvent::SplitChanging {
            orientation,
            position: self.clamp_sash(orientation, pos),
        };
        if !self.pane(PaneId::TopLeft)?.emit(&mut event) {
            return None;
        }
        let GridEvent::SplitChanging { position, .. } = event else {
            return None;
        };
        let position = self.clamp_sash(orientation, position);
        self.set_sash(orientation, Some(position));
        self.apply_layout();
        Some(position)
    }

    /// Finish the drag and announce the final position.
    pub fn end_sash_drag(&mut self) -> Option<i32> {
        let orientation = self.dragging.take()?;
        let position = self.sash_position(orientation)?;
        if let Some(grid) = self.pane(PaneId::TopLeft) {
            grid.send(GridEvent::SplitChanged {
                orientation,
                position,
            });
        }
        debug!(?orientation, position, "sash moved");
        Some(position)
    }

    /// Scroll `pane` and keep the linked panes aligned.
    pub fn scroll_pane(&mut self, pane: PaneId, dx: i32, dy: i32) -> bool {
        let Some(grid) = self.pane_mut(pane) else {
            return false;
        };
        if !grid.scroll_by(dx, dy) {
            return false;
        }
        let (x, y) = grid.scroll_position();
        for (id, other) in self.panes.iter_mut().filter(|(id, _)| **id != pane) {
            let (ox, oy) = other.grid.scroll_position();
            let nx = if id.is_right() == pane.is_right() { x } else { ox };
            let ny = if id.is_bottom() == pane.is_bottom() { y } else { oy };
            other.grid.scroll_to(nx, ny);
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::GridConfig;
    use crate::events::Response;
    use crate::table::StringTable;
    use crate::types::Coord;
    use crate::viewer::TableHandle;

    fn layout() -> SplitLayout {
        let grid = Grid::with_table(GridConfig::default(), TableHandle::owned(StringTable::new(200, 50)));
        SplitLayout::new(grid, 800, 600)
    }

    #[test]
    fn test_split_shares_state_and_hides_labels() {
        let mut l = layout();
        l.split(SashOrientation::Vertical, 400).unwrap();
        assert_eq!(l.pane_count(), 2);
        let right = l.pane(PaneId::TopRight).unwrap();
        assert!(right.same_grid(l.pane(PaneId::TopLeft).unwrap()));
        assert_eq!(right.viewport().row_label_width, 0);
        assert_eq!(right.view_count(), 2);
        assert_eq!(
            l.pane_rect(PaneId::TopRight),
            Some(CellRect {
                x: 404,
                y: 0,
                width: 396,
                height: 600
            })
        );

        l.pane_mut(PaneId::TopLeft)
            .unwrap()
            .set_cell_value(Coord::new(3, 3), "shared")
            .unwrap();
        assert_eq!(l.pane(PaneId::TopRight).unwrap().cell_value(Coord::new(3, 3)), "shared");
    }

    #[test]
    fn test_second_axis_creates_diagonal() {
        let mut l = layout();
        l.split(SashOrientation::Vertical, 400).unwrap();
        assert!(!l.can_split(PaneId::TopRight, SashOrientation::Vertical));
        assert!(l.split(SashOrientation::Vertical, 200).is_err());
        l.split(SashOrientation::Horizontal, 300).unwrap();
        assert_eq!(l.pane_count(), 4);
        assert_eq!(l.pane(PaneId::TopLeft).unwrap().view_count(), 4);
        assert_eq!(l.sash_at(401, 10), Some(SashOrientation::Vertical));
        assert_eq!(l.sash_at(10, 302), Some(SashOrientation::Horizontal));
    }

    #[test]
    fn test_unsplit_copies_scroll() {
        let mut l = layout();
        l.split(SashOrientation::Vertical, 400).unwrap();
        l.pane_mut(PaneId::TopRight).unwrap().scroll_to(640, 0);
        let removed = l.unsplit(SashOrientation::Vertical, true);
        assert_eq!(removed.len(), 1);
        assert_eq!(l.pane_count(), 1);
        let left = l.pane(PaneId::TopLeft).unwrap();
        assert_eq!(left.scroll_position().0, 640);
        assert_eq!(left.view_count(), 1);
        assert!(l.unsplit(SashOrientation::Vertical, true).is_empty());
    }

    #[test]
    fn test_unsplit_without_scroll_copy() {
        let mut l = layout();
        l.split(SashOrientation::Horizontal, 300).unwrap();
        l.pane_mut(PaneId::BottomLeft).unwrap().scroll_to(0, 500);
        l.unsplit(SashOrientation::Horizontal, false);
        assert_eq!(l.pane(PaneId::TopLeft).unwrap().scroll_position(), (0, 0));
    }

    #[test]
    fn test_sash_drag_override_and_veto() {
        let mut l = layout();
        l.split(SashOrientation::Vertical, 400).unwrap();
        let changed = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&changed);
        l.pane(PaneId::TopLeft).unwrap().subscribe(move |e: &mut GridEvent| match e {
            GridEvent::SplitChanging { position, .. } if *position > 600 => Response::Veto,
            GridEvent::SplitChanging { position, .. } => {
                *position = *position / 10 * 10;
                Response::Continue
            }
            GridEvent::SplitChanged { position, .. } => {
                log.borrow_mut().push(*position);
                Response::Continue
            }
            _ => Response::Continue,
        });
        assert!(l.begin_sash_drag(SashOrientation::Vertical));
        assert_eq!(l.drag_sash(257), Some(250));
        assert_eq!(l.drag_sash(700), None);
        assert_eq!(l.sash_position(SashOrientation::Vertical), Some(250));
        assert_eq!(l.drag_sash(-50), Some(32));
        assert_eq!(l.end_sash_drag(), Some(32));
        assert_eq!(*changed.borrow(), vec![32]);
        assert!(!l.begin_sash_drag(SashOrientation::Horizontal));
    }

    #[test]
    fn test_linked_scrolling() {
        let mut l = layout();
        l.split(SashOrientation::Vertical, 400).unwrap();
        l.split(SashOrientation::Horizontal, 300).unwrap();
        assert!(l.scroll_pane(PaneId::TopLeft, 100, 250));
        assert_eq!(l.pane(PaneId::TopRight).unwrap().scroll_position().1, 250);
        assert_eq!(l.pane(PaneId::BottomLeft).unwrap().scroll_position().0, 100);
        assert_eq!(l.pane(PaneId::BottomRight).unwrap().scroll_position(), (0, 0));
    }
}
