//! Viewport state for one view: scroll origin and client size.

use super::AxisSizing;

/// Visible area of one grid view, in unscaled pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: i32,
    /// Vertical scroll position in content coordinates
    pub scroll_y: i32,
    /// Client width including the row label column
    pub width: i32,
    /// Client height including the column label row
    pub height: i32,
    /// Width of the row label column (0 if hidden)
    pub row_label_width: i32,
    /// Height of the column label row (0 if hidden)
    pub col_label_height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            scroll_x: 0,
            scroll_y: 0,
            width,
            height,
            row_label_width: 0,
            col_label_height: 0,
        }
    }

    /// Width available to cells.
    pub fn cells_width(&self) -> i32 {
        (self.width - self.row_label_width).max(0)
    }

    /// Height available to cells.
    pub fn cells_height(&self) -> i32 {
        (self.height - self.col_label_height).max(0)
    }

    /// Visible row range (inclusive), `None` for an empty axis.
    pub fn visible_rows(&self, rows: &AxisSizing) -> Option<(i32, i32)> {
        Self::visible_range(rows, self.scroll_y, self.cells_height())
    }

    /// Visible column range (inclusive), `None` for an empty axis.
    pub fn visible_cols(&self, cols: &AxisSizing) -> Option<(i32, i32)> {
        Self::visible_range(cols, self.scroll_x, self.cells_width())
    }

    fn visible_range(axis: &AxisSizing, scroll: i32, extent: i32) -> Option<(i32, i32)> {
        if axis.count() == 0 {
            return None;
        }
        let start = axis.index_at(scroll, true);
        let end = axis.index_at(scroll + extent.max(1) - 1, true);
        Some((start, end))
    }

    /// Largest scroll offsets that still show content.
    pub fn max_scroll(&self, rows: &AxisSizing, cols: &AxisSizing) -> (i32, i32) {
        (
            (cols.total() - self.cells_width()).max(0),
            (rows.total() - self.cells_height()).max(0),
        )
    }

    /// Scroll to an absolute position, clamped to the content.
    ///
    /// Returns the applied delta, or `None` if nothing moved.
    pub fn scroll_to(
        &mut self,
        x: i32,
        y: i32,
        rows: &AxisSizing,
        cols: &AxisSizing,
    ) -> Option<(i32, i32)> {
        let (max_x, max_y) = self.max_scroll(rows, cols);
        let new_x = x.clamp(0, max_x);
        let new_y = y.clamp(0, max_y);
        let dx = new_x - self.scroll_x;
        let dy = new_y - self.scroll_y;
        if dx == 0 && dy == 0 {
            return None;
        }
        self.scroll_x = new_x;
        self.scroll_y = new_y;
        Some((dx, dy))
    }

    pub fn scroll_by(
        &mut self,
        dx: i32,
        dy: i32,
        rows: &AxisSizing,
        cols: &AxisSizing,
    ) -> Option<(i32, i32)> {
        self.scroll_to(self.scroll_x + dx, self.scroll_y + dy, rows, cols)
    }

    /// Content coordinates to client coordinates.
    pub fn to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x - self.scroll_x + self.row_label_width,
            y - self.scroll_y + self.col_label_height,
        )
    }

    /// Client coordinates to content coordinates.
    ///
    /// Positions over the label areas map to negative content offsets.
    pub fn to_content(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x - self.row_label_width + self.scroll_x,
            y - self.col_label_height + self.scroll_y,
        )
    }

    /// Scroll the minimum needed so that `[start, end)` on each axis is shown.
    pub fn scroll_to_show(
        &mut self,
        (x0, x1): (i32, i32),
        (y0, y1): (i32, i32),
        rows: &AxisSizing,
        cols: &AxisSizing,
    ) -> Option<(i32, i32)> {
        let x = Self::show_range(self.scroll_x, self.cells_width(), x0, x1);
        let y = Self::show_range(self.scroll_y, self.cells_height(), y0, y1);
        self.scroll_to(x, y, rows, cols)
    }

    fn show_range(scroll: i32, extent: i32, start: i32, end: i32) -> i32 {
        if start < scroll || end - start > extent {
            start
        } else if end > scroll + extent {
            end - extent
        } else {
            scroll
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range() {
        let rows = AxisSizing::new(100, 20, 5);
        let cols = AxisSizing::new(10, 50, 5);
        let mut vp = Viewport::new(200, 100);
        assert_eq!(vp.visible_rows(&rows), Some((0, 4)));
        assert_eq!(vp.visible_cols(&cols), Some((0, 3)));

        vp.scroll_to(60, 50, &rows, &cols);
        assert_eq!(vp.visible_rows(&rows), Some((2, 7)));
        assert_eq!(vp.visible_cols(&cols), Some((1, 5)));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let rows = AxisSizing::new(10, 20, 5);
        let cols = AxisSizing::new(10, 20, 5);
        let mut vp = Viewport::new(100, 100);
        assert_eq!(vp.scroll_by(-10, -10, &rows, &cols), None);
        assert_eq!(vp.scroll_by(1000, 1000, &rows, &cols), Some((100, 100)));
        assert_eq!((vp.scroll_x, vp.scroll_y), (100, 100));
    }

    #[test]
    fn test_screen_round_trip_with_labels() {
        let mut vp = Viewport::new(300, 300);
        vp.row_label_width = 40;
        vp.col_label_height = 20;
        vp.scroll_x = 15;
        vp.scroll_y = 7;
        let (sx, sy) = vp.to_screen(100, 50);
        assert_eq!((sx, sy), (125, 63));
        assert_eq!(vp.to_content(sx, sy), (100, 50));
        assert!(vp.to_content(10, 5).0 < 0);
    }

    #[test]
    fn test_scroll_to_show() {
        let rows = AxisSizing::new(100, 20, 5);
        let cols = AxisSizing::new(100, 20, 5);
        let mut vp = Viewport::new(100, 100);
        vp.scroll_to_show((0, 20), (300, 320), &rows, &cols);
        assert_eq!(vp.scroll_y, 220);
        vp.scroll_to_show((0, 20), (40, 60), &rows, &cols);
        assert_eq!(vp.scroll_y, 40);
    }
}
