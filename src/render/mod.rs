//! Cell renderers and paint descriptions for the host toolkit.
//!
//! This module provides:
//! - [`CellRenderer`]: how a value turns into display text and a best size
//! - [`TextMeasure`]: host supplied text metrics ([`FixedPitchMeasure`] default)
//! - [`CellRenderData`] and [`CellPainter`]: what the host paints
//! - Selection rectangle math for minimal refresh regions

mod backend;
mod selection;

pub use backend::{CellPainter, CellRenderData, CellStyleData};
pub use selection::{selection_rects, SelectionRect};

use tracing::warn;

use crate::attr::EffectiveAttr;
use crate::layout::CellRect;
use crate::types::{to_i32, Coord, Font, Orientation};

/// Horizontal padding inside a cell, per side.
pub const CELL_MARGIN_X: i32 = 2;
/// Vertical padding inside a cell, per side.
pub const CELL_MARGIN_Y: i32 = 1;

/// Text metrics supplied by the host.
pub trait TextMeasure {
    /// Width and height of a single line of `text`.
    fn text_extent(&self, text: &str, font: &Font) -> (i32, i32);
}

/// Monospace approximation used when the host supplies no metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPitchMeasure;

impl TextMeasure for FixedPitchMeasure {
    fn text_extent(&self, text: &str, font: &Font) -> (i32, i32) {
        let pt = i32::from(font.point_size);
        let char_w = ((pt * 6 + 5) / 10).max(1);
        let line_h = pt + pt / 2;
        (to_i32(text.chars().count()) * char_w, line_h)
    }
}

/// Truthiness of a stored boolean cell value.
pub fn is_true(value: &str) -> bool {
    let v = value.trim();
    !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("no"))
}

/// How a cell value is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellRenderer {
    #[default]
    Text,
    /// Text wrapped at word boundaries to the cell width.
    AutoWrap,
    /// Integer; non-numeric text is shown unchanged.
    Number,
    /// Floating point with optional minimum width and fixed precision.
    Float {
        width: Option<u16>,
        precision: Option<u16>,
    },
    /// Check box.
    Bool,
}

impl CellRenderer {
    /// Apply a `base:params` parameter string.
    ///
    /// Only `Float` takes parameters (`width,precision`, either may be
    /// omitted). Returns `false` and leaves the renderer unchanged on
    /// malformed input.
    pub fn set_parameters(&mut self, params: &str) -> bool {
        let Self::Float { width, precision } = self else {
            return params.is_empty();
        };
        let mut parts = params.splitn(2, ',');
        let parse = |s: Option<&str>| -> Result<Option<u16>, ()> {
            match s.map(str::trim) {
                None | Some("") => Ok(None),
                Some(v) => v.parse().map(Some).map_err(|_| ()),
            }
        };
        match (parse(parts.next()), parse(parts.next())) {
            (Ok(w), Ok(p)) => {
                *width = w;
                *precision = p;
                true
            }
            _ => {
                warn!(params, "ignoring malformed float renderer parameters");
                false
            }
        }
    }

    /// Text shown for `value`.
    pub fn display_text(&self, value: &str) -> String {
        match self {
            Self::Text | Self::AutoWrap => value.to_string(),
            Self::Number => match value.trim().parse::<i64>() {
                Ok(n) => n.to_string(),
                Err(_) => value.to_string(),
            },
            Self::Float { width, precision } => {
                let Ok(v) = value.trim().parse::<f64>() else {
                    return value.to_string();
                };
                let w = usize::from(width.unwrap_or(0));
                match precision {
                    Some(p) => format!("{v:>w$.p$}", p = usize::from(*p)),
                    None => format!("{v:>w$}"),
                }
            }
            Self::Bool => {
                if is_true(value) {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
        }
    }

    /// Display lines for `value` inside a cell `width` pixels wide.
    pub fn lines(&self, value: &str, width: i32, font: &Font, measure: &dyn TextMeasure) -> Vec<String> {
        let text = self.display_text(value);
        match self {
            Self::AutoWrap => wrap_text(&text, width - 2 * CELL_MARGIN_X, font, measure),
            _ => text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Preferred `(width, height)` of a cell showing `value`.
    pub fn best_size(&self, value: &str, attr: &EffectiveAttr, measure: &dyn TextMeasure) -> (i32, i32) {
        let text = self.display_text(value);
        let (mut w, mut h) = (0, 0);
        for line in text.split('\n') {
            let (lw, lh) = measure.text_extent(line, &attr.font);
            w = w.max(lw);
            h += lh;
        }
        let (w, h) = (w + 2 * CELL_MARGIN_X, h + 2 * CELL_MARGIN_Y);
        match attr.orientation {
            Orientation::Horizontal => (w, h),
            Orientation::Vertical => (h, w),
        }
    }

    /// Describe how to paint `value` at `coord` into `rect` (client coordinates).
    pub fn draw(
        &self,
        coord: Coord,
        value: &str,
        attr: &EffectiveAttr,
        rect: CellRect,
        selected: bool,
        measure: &dyn TextMeasure,
    ) -> CellRenderData {
        let checked = matches!(self, Self::Bool).then(|| is_true(value));
        let lines = if checked.is_some() {
            Vec::new()
        } else {
            self.lines(value, rect.width, &attr.font, measure)
        };
        CellRenderData {
            coord,
            rect,
            clip: rect,
            lines,
            checked,
            selected,
            style: CellStyleData::from(attr),
        }
    }
}

/// Greedy word wrap; words wider than `width` get a line of their own.
fn wrap_text(text: &str, width: i32, font: &Font, measure: &dyn TextMeasure) -> Vec<String> {
    let mut out = Vec::new();
    for para in text.split('\n') {
        let mut line = String::new();
        for word in para.split(' ').filter(|w| !w.is_empty()) {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measure.text_extent(&candidate, font).0 <= width {
                line = candidate;
            } else {
                out.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CellRenderer::Text, " 42 ", " 42 " ; "text unchanged")]
    #[test_case(CellRenderer::Number, " 42 ", "42" ; "number trimmed")]
    #[test_case(CellRenderer::Number, "abc", "abc" ; "number fallback")]
    #[test_case(CellRenderer::Float { width: None, precision: Some(2) }, "3.14159", "3.14" ; "precision")]
    #[test_case(CellRenderer::Float { width: Some(6), precision: Some(1) }, "2.38", "   2.4" ; "width pads")]
    #[test_case(CellRenderer::Bool, "1", "[x]" ; "bool true")]
    #[test_case(CellRenderer::Bool, "false", "[ ]" ; "bool false")]
    fn test_display_text(renderer: CellRenderer, value: &str, expected: &str) {
        assert_eq!(renderer.display_text(value), expected);
    }

    #[test]
    fn test_float_parameters() {
        let mut r = CellRenderer::Float {
            width: None,
            precision: None,
        };
        assert!(r.set_parameters("6,2"));
        assert_eq!(
            r,
            CellRenderer::Float {
                width: Some(6),
                precision: Some(2)
            }
        );
        assert!(r.set_parameters(",3"));
        assert_eq!(
            r,
            CellRenderer::Float {
                width: None,
                precision: Some(3)
            }
        );
        assert!(!r.set_parameters("x,1"));
        assert!(!CellRenderer::Text.set_parameters("1"));
    }

    #[test]
    fn test_auto_wrap() {
        let font = Font::default();
        let m = FixedPitchMeasure;
        // 6px per char at 10pt, 4px margins
        let lines = CellRenderer::AutoWrap.lines("one two three", 4 + 6 * 8, &font, &m);
        assert_eq!(lines, vec!["one two", "three"]);
    }

    #[test]
    fn test_best_size_multiline_and_vertical() {
        let m = FixedPitchMeasure;
        let mut attr = EffectiveAttr::default();
        let (w, h) = CellRenderer::Text.best_size("ab\nabcd", &attr, &m);
        assert_eq!((w, h), (4 * 6 + 4, 2 * 15 + 2));
        attr.orientation = Orientation::Vertical;
        assert_eq!(CellRenderer::Text.best_size("ab\nabcd", &attr, &m), (h, w));
    }

    #[test]
    fn test_draw_bool_has_no_text() {
        let rect = CellRect {
            x: 0,
            y: 0,
            width: 80,
            height: 25,
        };
        let data = CellRenderer::Bool.draw(
            Coord::new(0, 0),
            "yes",
            &EffectiveAttr::default(),
            rect,
            false,
            &FixedPitchMeasure,
        );
        assert_eq!(data.checked, Some(true));
        assert!(data.lines.is_empty());
    }
}
