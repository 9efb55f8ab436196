//! Per-axis row/column sizing.
//!
//! Every row (or column) starts at the default size. Explicit sizes are only
//! materialized into arrays once the first one differs from the default, so
//! huge uniform grids cost nothing and map pixels to indices in O(1).

use std::collections::HashMap;

use crate::types::{to_i32, to_index};

/// Sizes and cumulative edges for one axis.
#[derive(Debug, Clone)]
pub struct AxisSizing {
    count: i32,
    default_size: i32,
    /// Global floor; explicit sizes below it are rejected.
    min_floor: i32,
    /// Per-index minimums, never below `min_floor`.
    min_overrides: HashMap<i32, i32>,
    /// Empty until an explicit size is set.
    sizes: Vec<i32>,
    /// `edges[i]` = end (exclusive) of entry `i`.
    edges: Vec<i32>,
}

impl AxisSizing {
    pub fn new(count: i32, default_size: i32, min_floor: i32) -> Self {
        let min_floor = min_floor.max(0);
        Self {
            count: count.max(0),
            default_size: default_size.max(min_floor).max(1),
            min_floor,
            min_overrides: HashMap::new(),
            sizes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn default_size(&self) -> i32 {
        self.default_size
    }

    pub fn min_floor(&self) -> i32 {
        self.min_floor
    }

    /// Whether any explicit size has been materialized.
    pub fn has_overrides(&self) -> bool {
        !self.sizes.is_empty()
    }

    pub fn size(&self, i: i32) -> i32 {
        if i < 0 || i >= self.count {
            return 0;
        }
        to_index(i)
            .and_then(|idx| self.sizes.get(idx))
            .copied()
            .unwrap_or(self.default_size)
    }

    /// Pixel offset where entry `i` starts.
    pub fn start(&self, i: i32) -> i32 {
        if i <= 0 {
            return 0;
        }
        let i = i.min(self.count);
        if self.sizes.is_empty() {
            return i.saturating_mul(self.default_size);
        }
        to_index(i - 1)
            .and_then(|idx| self.edges.get(idx))
            .copied()
            .unwrap_or(0)
    }

    /// Pixel offset where entry `i` ends (exclusive).
    pub fn end(&self, i: i32) -> i32 {
        self.start(i) + self.size(i)
    }

    /// Total extent of the axis.
    pub fn total(&self) -> i32 {
        self.start(self.count)
    }

    /// Smallest size entry `i` may be given.
    pub fn min_size(&self, i: i32) -> i32 {
        self.min_overrides
            .get(&i)
            .copied()
            .unwrap_or(self.min_floor)
    }

    /// Per-index minimum. Ignored when below the global floor.
    pub fn set_min_size(&mut self, i: i32, min: i32) -> bool {
        if min < self.min_floor || i < 0 || i >= self.count {
            return false;
        }
        self.min_overrides.insert(i, min);
        true
    }

    pub fn set_min_floor(&mut self, floor: i32) {
        self.min_floor = floor.max(0);
        let floor = self.min_floor;
        self.min_overrides.retain(|_, v| *v >= floor);
    }

    /// Change the default size. With `reset` every explicit size is dropped.
    pub fn set_default_size(&mut self, size: i32, reset: bool) {
        let size = size.max(self.min_floor).max(1);
        if reset || self.sizes.is_empty() {
            self.sizes.clear();
            self.edges.clear();
            self.default_size = size;
            return;
        }
        self.default_size = size;
    }

    /// Set an explicit size. A value below the minimum is a silent no-op.
    pub fn set_size(&mut self, i: i32, size: i32) -> bool {
        let Some(idx) = to_index(i).filter(|_| i < self.count) else {
            return false;
        };
        if size < self.min_size(i) {
            return false;
        }
        if self.sizes.is_empty() {
            if size == self.default_size {
                return true;
            }
            self.materialize();
        }
        let Some(slot) = self.sizes.get_mut(idx) else {
            return false;
        };
        let delta = size - *slot;
        *slot = size;
        if let Some(tail) = self.edges.get_mut(idx..) {
            for edge in tail {
                *edge += delta;
            }
        }
        true
    }

    /// Insert (`count > 0`) or remove (`count < 0`) entries at `pos`.
    ///
    /// Inserts with `pos < 0` or past the end append. Removals outside the
    /// axis are ignored and oversized removals are clamped.
    pub fn insert_or_delete(&mut self, pos: i32, count: i32) {
        if count > 0 {
            let pos = if pos < 0 || pos > self.count {
                self.count
            } else {
                pos
            };
            self.count += count;
            self.shift_min_overrides(pos, count);
            if let Some(idx) = to_index(pos).filter(|_| !self.sizes.is_empty()) {
                let fill = std::iter::repeat(self.default_size).take(to_index(count).unwrap_or(0));
                self.sizes.splice(idx..idx, fill);
                self.recompute_edges_from(idx);
            }
        } else if count < 0 {
            if pos < 0 || pos >= self.count {
                return;
            }
            let n = count.saturating_neg().min(self.count - pos);
            self.count -= n;
            self.shift_min_overrides(pos, -n);
            if let (Some(idx), Some(len)) = (to_index(pos), to_index(n)) {
                if !self.sizes.is_empty() {
                    let end = (idx + len).min(self.sizes.len());
                    self.sizes.drain(idx..end);
                    self.recompute_edges_from(idx);
                }
            }
        }
    }

    /// Map a pixel offset to an index.
    ///
    /// Negative offsets give `-1`, or `0` when clipping a non-empty axis.
    /// Offsets past the end give the last index when clipping, else `-1`.
    pub fn index_at(&self, pos: i32, clip: bool) -> i32 {
        if self.count <= 0 {
            return -1;
        }
        if pos < 0 {
            return if clip { 0 } else { -1 };
        }
        if pos >= self.total() {
            return if clip { self.count - 1 } else { -1 };
        }

        let guess = (pos / self.default_size.max(1)).min(self.count - 1);
        if self.sizes.is_empty() {
            return guess;
        }
        to_i32(self.search_edges(pos, to_index(guess).unwrap_or(0)))
    }

    /// First index whose edge lies past `pos`, galloping out from `guess`.
    ///
    /// Requires `pos < total()`, so the last edge always satisfies the search.
    fn search_edges(&self, pos: i32, guess: usize) -> usize {
        let past = |i: usize| self.edges.get(i).is_some_and(|&e| e > pos);
        let last = self.edges.len().saturating_sub(1);
        let guess = guess.min(last);

        let (lo, hi) = if past(guess) {
            let mut hi = guess;
            let mut step = 1;
            let lo = loop {
                if hi == 0 {
                    break 0;
                }
                let probe = hi.saturating_sub(step);
                if !past(probe) {
                    break probe + 1;
                }
                hi = probe;
                step *= 2;
            };
            (lo, hi)
        } else {
            let mut lo = guess + 1;
            let mut step = 1;
            let hi = loop {
                let probe = (lo + step - 1).min(last);
                if past(probe) || probe == last {
                    break probe;
                }
                lo = probe + 1;
                step *= 2;
            };
            (lo, hi)
        };

        lo + self
            .edges
            .get(lo..hi)
            .map_or(0, |window| window.partition_point(|&e| e <= pos))
    }

    fn materialize(&mut self) {
        let len = to_index(self.count).unwrap_or(0);
        self.sizes = vec![self.default_size; len];
        self.edges = Vec::with_capacity(len);
        self.recompute_edges_from(0);
    }

    fn recompute_edges_from(&mut self, from: usize) {
        self.edges.truncate(from);
        let mut acc = from
            .checked_sub(1)
            .and_then(|i| self.edges.get(i))
            .copied()
            .unwrap_or(0);
        for size in self.sizes.iter().skip(from) {
            acc += size;
            self.edges.push(acc);
        }
    }

    fn shift_min_overrides(&mut self, pos: i32, delta: i32) {
        if self.min_overrides.is_empty() {
            return;
        }
        let old = std::mem::take(&mut self.min_overrides);
        self.min_overrides = old
            .into_iter()
            .filter_map(|(i, v)| {
                if i < pos {
                    Some((i, v))
                } else if delta < 0 && i < pos - delta {
                    None
                } else {
                    Some((i + delta, v))
                }
            })
            .collect();
    }
}
