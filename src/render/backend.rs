//! Paint descriptions handed to the host toolkit.
//!
//! The grid never draws pixels itself. It resolves what each visible cell
//! looks like and passes a [`CellRenderData`] to a host [`CellPainter`].

use crate::attr::EffectiveAttr;
use crate::layout::CellRect;
use crate::types::{Color, Coord, Font, HAlign, Orientation, VAlign};

/// Resolved style of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStyleData {
    pub back_color: Color,
    pub text_color: Color,
    pub font: Font,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub orientation: Orientation,
}

impl From<&EffectiveAttr> for CellStyleData {
    fn from(attr: &EffectiveAttr) -> Self {
        Self {
            back_color: attr.back_color.clone(),
            text_color: attr.text_color.clone(),
            font: attr.font.clone(),
            h_align: attr.h_align,
            v_align: attr.v_align,
            orientation: attr.orientation,
        }
    }
}

/// Data needed to paint a single cell or label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRenderData {
    pub coord: Coord,
    /// Cell (or merged block) rectangle in client coordinates.
    pub rect: CellRect,
    /// Area text may use; wider than `rect` when the text overflows into
    /// empty neighbours.
    pub clip: CellRect,
    pub lines: Vec<String>,
    /// Check box state for boolean cells.
    pub checked: Option<bool>,
    pub selected: bool,
    pub style: CellStyleData,
}

/// Host side of painting.
pub trait CellPainter {
    /// Paint one cell, row label, column label or the corner.
    fn paint_cell(&mut self, cell: &CellRenderData);

    /// Paint the selection highlight. Hosts that tint selected cells in
    /// `paint_cell` can ignore this.
    fn paint_selection(&mut self, _rect: &super::SelectionRect) {}
}

impl<P: CellPainter + ?Sized> CellPainter for &mut P {
    fn paint_cell(&mut self, cell: &CellRenderData) {
        (**self).paint_cell(cell);
    }

    fn paint_selection(&mut self, rect: &super::SelectionRect) {
        (**self).paint_selection(rect);
    }
}
