//! One-entry memo above attribute resolution.
//!
//! Painting asks for the same cell's attribute several times in a row
//! (background, text, overflow checks). The memo holds the last answer and is
//! invalidated through a generation number that the shared state bumps on
//! every attribute write, structural change and batch start.

use super::{AttrKind, CellAttr};
use crate::types::Coord;

#[derive(Debug, Clone)]
struct Entry {
    coord: Coord,
    kind: AttrKind,
    generation: u64,
    attr: Option<CellAttr>,
}

#[derive(Debug, Clone, Default)]
pub struct AttrCache {
    entry: Option<Entry>,
    hits: u64,
    misses: u64,
}

impl AttrCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached lookup, resolving with `resolve` on a miss.
    pub fn get_or_resolve(
        &mut self,
        coord: Coord,
        kind: AttrKind,
        generation: u64,
        resolve: impl FnOnce() -> Option<CellAttr>,
    ) -> Option<CellAttr> {
        if let Some(e) = &self.entry {
            if e.coord == coord && e.kind == kind && e.generation == generation {
                self.hits += 1;
                return e.attr.clone();
            }
        }
        self.misses += 1;
        let attr = resolve();
        self.entry = Some(Entry {
            coord,
            kind,
            generation,
            attr: attr.clone(),
        });
        attr
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_generation_miss() {
        let mut cache = AttrCache::new();
        let at = Coord::new(1, 1);
        let mut calls = 0;
        let mut attr = CellAttr::new();
        attr.set_overflow(false);

        for _ in 0..3 {
            cache.get_or_resolve(at, AttrKind::Any, 7, || {
                calls += 1;
                Some(attr.clone())
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.stats(), (2, 1));

        let got = cache.get_or_resolve(at, AttrKind::Any, 8, || None);
        assert!(got.is_none());
        assert_eq!(cache.stats(), (2, 2));
    }

    #[test]
    fn test_kind_is_part_of_key() {
        let mut cache = AttrCache::new();
        let at = Coord::new(0, 0);
        cache.get_or_resolve(at, AttrKind::Row, 0, || Some(CellAttr::new()));
        let got = cache.get_or_resolve(at, AttrKind::Cell, 0, || None);
        assert!(got.is_none());
        cache.invalidate();
        assert_eq!(cache.stats().0, 0);
    }
}
