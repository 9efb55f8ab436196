//! Attribute access, renderer/editor resolution and painting for a view.

use std::collections::HashSet;

use tracing::trace;

use super::{Grid, SharedGridState};
use crate::attr::{AttrKind, CellAttr, EffectiveAttr};
use crate::editor::CellEditor;
use crate::error::{GridError, Result};
use crate::render::{
    selection_rects, CellPainter, CellRenderData, CellRenderer, TextMeasure, CELL_MARGIN_X,
};
use crate::types::{Block, Coord, HAlign, Orientation, LABEL};

/// Part of the grid a coordinate falls in. Each has its own root attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridRegion {
    Cells,
    RowLabels,
    ColLabels,
    Corner,
}

impl GridRegion {
    pub fn of(coord: Coord) -> Self {
        match (coord.row == LABEL, coord.col == LABEL) {
            (true, true) => Self::Corner,
            (false, true) => Self::RowLabels,
            (true, false) => Self::ColLabels,
            (false, false) => Self::Cells,
        }
    }
}

impl SharedGridState {
    pub(crate) fn region_default(&self, region: GridRegion) -> &EffectiveAttr {
        match region {
            GridRegion::Cells => &self.defaults.cells,
            GridRegion::RowLabels => &self.defaults.row_labels,
            GridRegion::ColLabels => &self.defaults.col_labels,
            GridRegion::Corner => &self.defaults.corner,
        }
    }

    /// Whether `coord` is addressable for an attribute of `kind`.
    fn check_attr_coord(&self, coord: Coord, kind: AttrKind) -> Result<()> {
        if !self.has_table() {
            return Err(GridError::NotReady);
        }
        let (rows, cols) = (self.number_rows(), self.number_cols());
        let row_ok = (0..rows).contains(&coord.row);
        let col_ok = (0..cols).contains(&coord.col);
        let ok = match (GridRegion::of(coord), kind) {
            (GridRegion::Corner, _) => false,
            (GridRegion::RowLabels, _) | (GridRegion::Cells, AttrKind::Row) => row_ok,
            (GridRegion::ColLabels, _) | (GridRegion::Cells, AttrKind::Col) => col_ok,
            (GridRegion::Cells, _) => row_ok && col_ok,
        };
        if ok {
            Ok(())
        } else {
            Err(GridError::invalid(coord.row, coord.col))
        }
    }
}

/// Renderers whose single-line text may run into empty neighbours.
fn can_overflow(renderer: &CellRenderer, attr: &EffectiveAttr) -> bool {
    attr.overflow
        && attr.h_align == HAlign::Left
        && attr.orientation == Orientation::Horizontal
        && matches!(
            renderer,
            CellRenderer::Text | CellRenderer::Number | CellRenderer::Float { .. }
        )
}

impl Grid {
    /// Store (`Some`) or remove (`None`) the attribute of `kind` at `coord`.
    ///
    /// Row attributes are addressed by `coord.row`, column attributes by
    /// `coord.col`. Label coordinates address the label attributes.
    pub fn set_attr(&mut self, coord: Coord, attr: Option<CellAttr>, kind: AttrKind) -> Result<()> {
        let mut st = self.state_mut();
        st.check_attr_coord(coord, kind)?;
        st.attrs.set(coord, attr, kind);
        st.invalidate_attrs();
        let (rows, cols) = (st.number_rows(), st.number_cols());
        match (GridRegion::of(coord), kind) {
            (GridRegion::Cells, AttrKind::Row) => st.refresh_block(Block::new(coord.row, 0, 1, cols)),
            (GridRegion::Cells, AttrKind::Col) => st.refresh_block(Block::new(0, coord.col, rows, 1)),
            (GridRegion::Cells, _) => st.refresh_block(Block::single(coord)),
            _ => st.refresh_all(),
        }
        Ok(())
    }

    pub fn set_cell_attr(&mut self, coord: Coord, attr: CellAttr) -> Result<()> {
        self.set_attr(coord, Some(attr), AttrKind::Cell)
    }

    pub fn set_row_attr(&mut self, row: i32, attr: Option<CellAttr>) -> Result<()> {
        self.set_attr(Coord::new(row, 0), attr, AttrKind::Row)
    }

    pub fn set_col_attr(&mut self, col: i32, attr: Option<CellAttr>) -> Result<()> {
        self.set_attr(Coord::new(0, col), attr, AttrKind::Col)
    }

    /// Attribute of `kind` at `coord`, merged for [`AttrKind::Any`].
    ///
    /// Lookups go through this view's one-entry cache.
    pub fn attr(&self, coord: Coord, kind: AttrKind) -> Option<CellAttr> {
        let st = self.state();
        let generation = st.attr_generation;
        self.cache
            .borrow_mut()
            .get_or_resolve(coord, kind, generation, || st.attrs.resolve(coord, kind))
    }

    /// `(hits, misses)` of this view's attribute cache.
    pub fn attr_cache_stats(&self) -> (u64, u64) {
        self.cache.borrow().stats()
    }

    /// Fully resolved attribute of `coord`.
    ///
    /// Renderer and editor come from the attribute chain, then from the
    /// registry entry of the cell's data type, then from the region root.
    pub fn effective_attr(&self, coord: Coord) -> EffectiveAttr {
        let region = GridRegion::of(coord);
        let coord = if region == GridRegion::Cells {
            self.owner_of(coord)
        } else {
            coord
        };
        let attr = self.attr(coord, AttrKind::Any);
        let (root, type_name) = {
            let st = self.state();
            let type_name = if region == GridRegion::Cells {
                st.type_name(coord)
            } else {
                None
            };
            (st.region_default(region).clone(), type_name)
        };
        let mut eff = attr
            .as_ref()
            .map_or_else(|| root.clone(), |a| a.effective(&root));

        let own_renderer = attr.as_ref().and_then(CellAttr::renderer).is_some();
        let own_editor = attr.as_ref().and_then(CellAttr::editor).is_some();
        if own_renderer && own_editor {
            return eff;
        }
        let Some(name) = type_name else {
            return eff;
        };
        match self.state_mut().registry.lookup(&name) {
            Ok(entry) => {
                if !own_renderer {
                    eff.renderer = entry.renderer.clone();
                }
                if !own_editor {
                    eff.editor = entry.editor.clone();
                }
            }
            Err(e) => trace!(%e, "using the default renderer and editor"),
        }
        eff
    }

    pub fn renderer_for(&self, coord: Coord) -> CellRenderer {
        self.effective_attr(coord).renderer
    }

    pub fn editor_for(&self, coord: Coord) -> CellEditor {
        self.effective_attr(coord).editor
    }

    pub fn default_attr(&self, region: GridRegion) -> EffectiveAttr {
        self.state().region_default(region).clone()
    }

    /// Replace the root attribute of `region`.
    pub fn set_default_attr(&mut self, region: GridRegion, attr: EffectiveAttr) {
        let mut st = self.state_mut();
        match region {
            GridRegion::Cells => st.defaults.cells = attr,
            GridRegion::RowLabels => st.defaults.row_labels = attr,
            GridRegion::ColLabels => st.defaults.col_labels = attr,
            GridRegion::Corner => st.defaults.corner = attr,
        }
        st.invalidate_attrs();
        st.refresh_all();
    }

    pub fn register_data_type(&mut self, name: &str, renderer: CellRenderer, editor: CellEditor) {
        let mut st = self.state_mut();
        st.registry.register(name, renderer, editor);
        st.refresh_all();
    }

    pub fn set_read_only(&mut self, coord: Coord, read_only: bool) -> Result<()> {
        let owner = self.owner_of(coord);
        let mut attr = self
            .state()
            .attrs
            .get(owner, AttrKind::Cell)
            .cloned()
            .unwrap_or_default();
        attr.set_read_only(read_only);
        self.set_attr(owner, Some(attr), AttrKind::Cell)
    }

    pub fn is_read_only(&self, coord: Coord) -> bool {
        self.effective_attr(coord).read_only
    }

    // ----- sizing to content -------------------------------------------

    /// Fit column `col` to its widest value and label.
    pub fn auto_size_col(&mut self, col: i32) -> Result<i32> {
        let (rows, min) = {
            let st = self.state();
            st.check_attr_coord(Coord::new(0, col), AttrKind::Col)?;
            (st.number_rows(), st.cols.min_size(col))
        };
        let measure = self.measure();
        let label = self.effective_attr(Coord::new(LABEL, col));
        let mut best = CellRenderer::Text
            .best_size(&self.col_label(col), &label, measure.as_ref())
            .0;
        for row in 0..rows {
            let coord = Coord::new(row, col);
            if self.span_of(coord).is_some() {
                continue;
            }
            let attr = self.effective_attr(coord);
            let value = self.cell_value(coord);
            best = best.max(attr.renderer.best_size(&value, &attr, measure.as_ref()).0);
        }
        let width = best.max(min);
        self.set_col_size(col, width);
        Ok(width)
    }

    /// Fit row `row` to its tallest value.
    pub fn auto_size_row(&mut self, row: i32) -> Result<i32> {
        let (cols, min) = {
            let st = self.state();
            st.check_attr_coord(Coord::new(row, 0), AttrKind::Row)?;
            (st.number_cols(), st.rows.min_size(row))
        };
        let measure = self.measure();
        let mut best = 0;
        for col in 0..cols {
            let coord = Coord::new(row, col);
            if self.span_of(coord).is_some() {
                continue;
            }
            let attr = self.effective_attr(coord);
            let value = self.cell_value(coord);
            best = best.max(attr.renderer.best_size(&value, &attr, measure.as_ref()).1);
        }
        let height = best.max(min);
        self.set_row_size(row, height);
        Ok(height)
    }

    /// Content width available to `owner` when its text needs `needed`
    /// pixels: its own width plus empty, unspanned cells to the right.
    pub(crate) fn overflow_width(&self, owner: Coord, width: i32, needed: i32) -> i32 {
        let st = self.state();
        let mut col = st.spans.span_of(owner).map_or(owner.col, |s| s.right()) + 1;
        let mut width = width;
        while width < needed && col < st.number_cols() {
            let next = Coord::new(owner.row, col);
            if st.spans.is_spanned(next) || !st.is_empty_cell(next) {
                break;
            }
            width += st.cols.size(col);
            col += 1;
        }
        width
    }

    // ----- painting -----------------------------------------------------

    fn render_cell(&self, coord: Coord, measure: &dyn TextMeasure) -> Option<CellRenderData> {
        let rect = self.client_cell_rect(coord)?;
        let attr = self.effective_attr(coord);
        let value = self.cell_value(coord);
        let selected = self.state().selection.contains(coord, true);
        let mut data = attr.renderer.draw(coord, &value, &attr, rect, selected, measure);
        if can_overflow(&attr.renderer, &attr) {
            let needed = data
                .lines
                .iter()
                .map(|l| measure.text_extent(l, &attr.font).0)
                .max()
                .unwrap_or(0)
                + 2 * CELL_MARGIN_X;
            if needed > rect.width {
                data.clip.width = self.overflow_width(coord, rect.width, needed);
            }
        }
        Some(data)
    }

    fn render_label(&self, coord: Coord, text: &str, measure: &dyn TextMeasure) -> Option<CellRenderData> {
        let rect = self.client_cell_rect(coord)?;
        let attr = self.effective_attr(coord);
        let selected = {
            let st = self.state();
            match GridRegion::of(coord) {
                GridRegion::RowLabels => st.selection.is_row_selected(coord.row),
                GridRegion::ColLabels => st.selection.is_col_selected(coord.col),
                _ => false,
            }
        };
        Some(CellRenderer::Text.draw(coord, text, &attr, rect, selected, measure))
    }

    /// Paint descriptions of every visible cell and label of this view.
    ///
    /// Merged cells appear once, under their owner, even when the owner is
    /// scrolled out. Cells whose text overflows come after the neighbours
    /// they run into.
    pub fn render_cells(&self) -> Vec<CellRenderData> {
        let measure = self.measure();
        let measure = measure.as_ref();
        let (rows, cols) = {
            let st = self.state();
            (self.viewport.visible_rows(&st.rows), self.viewport.visible_cols(&st.cols))
        };
        let mut out = Vec::new();
        let mut overflowing = Vec::new();
        if let (Some((r0, r1)), Some((c0, c1))) = (rows, cols) {
            let mut drawn = HashSet::new();
            for row in r0..=r1 {
                for col in c0..=c1 {
                    let owner = self.owner_of(Coord::new(row, col));
                    if !drawn.insert(owner) {
                        continue;
                    }
                    let Some(data) = self.render_cell(owner, measure) else {
                        continue;
                    };
                    if data.clip.width > data.rect.width {
                        overflowing.push(data);
                    } else {
                        out.push(data);
                    }
                }
            }
        }
        out.append(&mut overflowing);

        let show_rows = self.viewport.row_label_width > 0;
        let show_cols = self.viewport.col_label_height > 0;
        if let (Some((r0, r1)), true) = (rows, show_rows) {
            for row in r0..=r1 {
                let coord = Coord::new(row, LABEL);
                out.extend(self.render_label(coord, &self.row_label(row), measure));
            }
        }
        if let (Some((c0, c1)), true) = (cols, show_cols) {
            for col in c0..=c1 {
                let coord = Coord::new(LABEL, col);
                out.extend(self.render_label(coord, &self.col_label(col), measure));
            }
        }
        if show_rows && show_cols {
            out.extend(self.render_label(Coord::new(LABEL, LABEL), "", measure));
        }
        out
    }

    /// Hand every visible cell, label and selection rectangle to `painter`.
    pub fn paint(&self, painter: &mut dyn CellPainter) {
        for cell in self.render_cells() {
            painter.paint_cell(&cell);
        }
        let rects = {
            let st = self.state();
            let blocks: Vec<Block> = st
                .selection
                .blocks()
                .iter()
                .copied()
                .chain(st.selection.selecting())
                .map(|b| st.spans.expand_to_spans(b))
                .collect();
            selection_rects(&blocks, &st.rows, &st.cols, &self.viewport)
        };
        for rect in &rects {
            painter.paint_selection(rect);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::registry::GRID_VALUE_BOOL;
    use crate::table::StringTable;
    use crate::viewer::TableHandle;

    fn grid() -> Grid {
        let mut table = StringTable::new(5, 4);
        table.set_col_type(3, GRID_VALUE_BOOL);
        Grid::with_table(GridConfig::default(), TableHandle::owned(table))
    }

    #[test]
    fn test_closest_scope_wins() {
        let mut g = grid();
        let mut row = CellAttr::new();
        row.set_back_color("#FF0000").set_text_color("#00FF00");
        let mut cell = CellAttr::new();
        cell.set_back_color("#0000FF");
        g.set_row_attr(1, Some(row)).unwrap();
        g.set_cell_attr(Coord::new(1, 1), cell).unwrap();

        let eff = g.effective_attr(Coord::new(1, 1));
        assert_eq!(eff.back_color, "#0000FF");
        assert_eq!(eff.text_color, "#00FF00");
        assert_eq!(g.effective_attr(Coord::new(1, 0)).back_color, "#FF0000");
        assert_eq!(g.effective_attr(Coord::new(0, 0)).back_color, "#FFFFFF");
    }

    #[test]
    fn test_cache_invalidated_by_writes() {
        let mut g = grid();
        assert!(g.attr(Coord::new(0, 0), AttrKind::Any).is_none());
        assert!(g.attr(Coord::new(0, 0), AttrKind::Any).is_none());
        assert_eq!(g.attr_cache_stats(), (1, 1));
        g.set_read_only(Coord::new(0, 0), true).unwrap();
        assert!(g.is_read_only(Coord::new(0, 0)));
        g.set_read_only(Coord::new(0, 0), false).unwrap();
        assert!(!g.is_read_only(Coord::new(0, 0)));
    }

    #[test]
    fn test_renderer_from_type_then_attr() {
        let mut g = grid();
        assert_eq!(g.renderer_for(Coord::new(0, 3)), CellRenderer::Bool);
        assert_eq!(g.editor_for(Coord::new(0, 3)), CellEditor::Bool);
        assert_eq!(g.renderer_for(Coord::new(0, 0)), CellRenderer::Text);

        let mut attr = CellAttr::new();
        attr.set_renderer(CellRenderer::Number);
        g.set_cell_attr(Coord::new(0, 3), attr).unwrap();
        assert_eq!(g.renderer_for(Coord::new(0, 3)), CellRenderer::Number);
        assert_eq!(g.editor_for(Coord::new(0, 3)), CellEditor::Bool);
    }

    #[test]
    fn test_label_defaults_and_bad_coords() {
        let mut g = grid();
        assert!(g.effective_attr(Coord::new(LABEL, 2)).font.bold);
        assert!(g.set_row_attr(9, Some(CellAttr::new())).is_err());
        assert!(g.set_attr(Coord::new(LABEL, LABEL), Some(CellAttr::new()), AttrKind::Cell).is_err());
    }

    #[test]
    fn test_overflow_stops_at_non_empty() {
        let mut g = grid();
        g.set_cell_value(Coord::new(0, 0), &"x".repeat(30)).unwrap();
        g.set_cell_value(Coord::new(0, 2), "stop").unwrap();
        let cells = g.render_cells();
        let first = cells.iter().find(|c| c.coord == Coord::new(0, 0)).unwrap();
        assert_eq!(first.rect.width, 80);
        assert_eq!(first.clip.width, 160);
        // painted after the neighbour it covers
        let pos = |c: Coord| cells.iter().position(|d| d.coord == c).unwrap();
        assert!(pos(Coord::new(0, 0)) > pos(Coord::new(0, 1)));
    }

    #[test]
    fn test_auto_size_col() {
        let mut g = grid();
        g.set_cell_value(Coord::new(2, 1), &"w".repeat(20)).unwrap();
        let width = g.auto_size_col(1).unwrap();
        // 20 chars at 6px plus margins
        assert_eq!(width, 124);
        assert_eq!(g.col_size(1), 124);
    }

    #[test]
    fn test_render_labels_and_spans() {
        let mut g = grid();
        g.set_span(Block::new(0, 0, 2, 2)).unwrap();
        let cells = g.render_cells();
        assert_eq!(cells.iter().filter(|c| c.coord == Coord::new(0, 0)).count(), 1);
        assert!(cells.iter().all(|c| c.coord != Coord::new(1, 1)));
        let label = cells.iter().find(|c| c.coord == Coord::new(LABEL, 2)).unwrap();
        assert_eq!(label.lines, vec!["C".to_string()]);
        assert!(cells.iter().any(|c| c.coord == Coord::new(LABEL, LABEL)));
    }
}
