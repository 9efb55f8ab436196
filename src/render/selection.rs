//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on the host
//! toolkit. They also turn net-new selection blocks into refresh regions.

use crate::layout::{block_rect, AxisSizing, Viewport};
use crate::types::Block;

/// Screen rectangle of (part of) a selected block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

/// Client rectangles of `blocks` that intersect the cell area of `viewport`.
///
/// Whole-row/column sentinel blocks are clamped to the grid first. Edge flags
/// are cleared where the visible area cuts the block.
pub fn selection_rects(
    blocks: &[Block],
    rows: &AxisSizing,
    cols: &AxisSizing,
    viewport: &Viewport,
) -> Vec<SelectionRect> {
    let view_x0 = viewport.row_label_width;
    let view_y0 = viewport.col_label_height;
    let view_x1 = view_x0 + viewport.cells_width();
    let view_y1 = view_y0 + viewport.cells_height();

    let mut rects = Vec::new();
    for block in blocks {
        let b = block.clamp_to(rows.count(), cols.count());
        if b.is_empty() {
            continue;
        }
        let r = block_rect(rows, cols, b.top_left(), b.bottom_right());
        let (sx1, sy1) = viewport.to_screen(r.x, r.y);
        let (sx2, sy2) = viewport.to_screen(r.right(), r.bottom());

        let x1 = sx1.max(view_x0);
        let y1 = sy1.max(view_y0);
        let x2 = sx2.min(view_x1);
        let y2 = sy2.min(view_y1);
        if x2 <= x1 || y2 <= y1 {
            continue;
        }
        rects.push(SelectionRect {
            x: x1,
            y: y1,
            w: x2 - x1,
            h: y2 - y1,
            draw_top: y1 == sy1,
            draw_bottom: y2 == sy2,
            draw_left: x1 == sx1,
            draw_right: x2 == sx2,
        });
    }
    rects
}
