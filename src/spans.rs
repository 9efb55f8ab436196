//! Merged cells.
//!
//! A span is a block whose cells all behave as its top-left cell (the
//! owner). Spans never overlap each other and are at least two cells big.

use tracing::{debug, warn};

use crate::error::{GridError, Result};
use crate::types::{Axis, Block, Coord};

#[derive(Debug, Clone, Default)]
pub struct SpanSet {
    spans: Vec<Block>,
}

impl SpanSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[Block] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Create, resize or remove the span at `block.top_left()`.
    ///
    /// - `block` must lie inside a `rows` x `cols` grid
    /// - touching two or more spans is a conflict
    /// - touching one span with a different owner is a conflict
    /// - a 1x1 block removes the span it owns
    pub fn set_span(&mut self, block: Block, rows: i32, cols: i32) -> Result<()> {
        if block.is_empty() || block.top < 0 || block.left < 0 {
            return Err(GridError::invalid(block.top, block.left));
        }
        if block.bottom() >= rows || block.right() >= cols {
            warn!(?block, rows, cols, "span outside the grid");
            return Err(GridError::invalid(block.bottom(), block.right()));
        }

        let mut touching = self
            .spans
            .iter()
            .enumerate()
            .filter(|(_, s)| s.intersects(&block))
            .map(|(i, _)| i);
        let first = touching.next();
        if touching.next().is_some() {
            warn!(?block, "span overlaps several spans");
            return Err(GridError::SpanConflict(format!(
                "block at ({}, {}) overlaps several merged cells",
                block.top, block.left
            )));
        }
        let single = block.height == 1 && block.width == 1;

        match first {
            Some(i) => {
                let Some(existing) = self.spans.get(i).copied() else {
                    return Ok(());
                };
                if existing.top_left() != block.top_left() {
                    warn!(?block, ?existing, "span owner mismatch");
                    return Err(GridError::SpanConflict(format!(
                        "block at ({}, {}) overlaps the merged cell at ({}, {})",
                        block.top, block.left, existing.top, existing.left
                    )));
                }
                if single {
                    self.spans.remove(i);
                    debug!(?existing, "span removed");
                } else if let Some(slot) = self.spans.get_mut(i) {
                    *slot = block;
                    debug!(?existing, ?block, "span resized");
                }
            }
            None if single => {}
            None => {
                self.spans.push(block);
                debug!(?block, "span added");
            }
        }
        Ok(())
    }

    /// The span covering `coord`, if any.
    pub fn span_of(&self, coord: Coord) -> Option<Block> {
        self.spans.iter().copied().find(|s| s.contains(coord))
    }

    /// The coordinate that stands for `coord`: its span's top-left, or
    /// `coord` itself.
    pub fn owner_of(&self, coord: Coord) -> Coord {
        self.span_of(coord).map_or(coord, |s| s.top_left())
    }

    pub fn is_spanned(&self, coord: Coord) -> bool {
        self.span_of(coord).is_some()
    }

    /// Covered by a span without being its owner.
    pub fn is_covered(&self, coord: Coord) -> bool {
        self.span_of(coord).is_some_and(|s| s.top_left() != coord)
    }

    /// Grow `block` until no span is only partially inside it.
    pub fn expand_to_spans(&self, block: Block) -> Block {
        if block.is_empty() {
            return block;
        }
        let mut out = block;
        loop {
            let grown = self
                .spans
                .iter()
                .filter(|s| s.intersects(&out))
                .fold(out, |acc, s| acc.union(s));
            if grown == out {
                return out;
            }
            out = grown;
        }
    }

    pub fn update_rows(&mut self, pos: i32, delta: i32) {
        self.update_axis(Axis::Row, pos, delta);
    }

    pub fn update_cols(&mut self, pos: i32, delta: i32) {
        self.update_axis(Axis::Col, pos, delta);
    }

    /// Insertions grow spans they fall inside; deletions shrink them.
    /// Spans reduced to a single cell are dropped.
    fn update_axis(&mut self, axis: Axis, pos: i32, delta: i32) {
        if delta == 0 {
            return;
        }
        self.spans = std::mem::take(&mut self.spans)
            .into_iter()
            .filter_map(|s| {
                let (start, len) = match axis {
                    Axis::Row => (s.top, s.height),
                    Axis::Col => (s.left, s.width),
                };
                let (start, len) = shift_range(start, len, pos, delta)?;
                let b = match axis {
                    Axis::Row => Block::new(start, s.left, len, s.width),
                    Axis::Col => Block::new(s.top, start, s.height, len),
                };
                (b.area() > 1).then_some(b)
            })
            .collect();
    }
}

/// New `(start, len)` of the range `start..start+len` after `delta` entries
/// were inserted (`delta > 0`) or deleted at `pos`.
fn shift_range(start: i32, len: i32, pos: i32, delta: i32) -> Option<(i32, i32)> {
    let end = start + len - 1;
    if delta > 0 {
        return Some(if pos <= start {
            (start + delta, len)
        } else if pos <= end {
            (start, len + delta)
        } else {
            (start, len)
        });
    }
    let n = -delta;
    let del_end = pos + n - 1;
    let map = |i: i32, before: bool| -> i32 {
        if i < pos {
            i
        } else if i > del_end {
            i - n
        } else if before {
            pos - 1
        } else {
            pos
        }
    };
    let new_start = map(start, false);
    let new_end = map(end, true);
    (new_end >= new_start).then_some((new_start, new_end - new_start + 1))
}
