//! Copy, cut and paste for a view.

use tracing::{debug, info};

use super::Grid;
use crate::clipboard::{ClipboardBackend, ClipboardContents, ClipboardPayload};
use crate::error::{GridError, Result};
use crate::types::{Block, Coord};

impl Grid {
    /// Replace the clipboard every view of this grid copies to.
    pub fn set_clipboard(&mut self, backend: Box<dyn ClipboardBackend>) {
        self.state_mut().clipboard = backend;
    }

    /// Non-empty values of the selected cells, or of the cursor cell when
    /// nothing is selected. Merged cells contribute their owner only.
    pub fn selection_payload(&self) -> ClipboardPayload {
        let st = self.state();
        if !st.has_table() {
            return ClipboardPayload::new();
        }
        let cells = if st.selection.is_empty() {
            Block::single(self.cursor)
                .clamp_to(st.number_rows(), st.number_cols())
                .cells()
                .collect()
        } else {
            st.selection.selected_cells()
        };
        cells
            .into_iter()
            .filter(|c| !st.spans.is_covered(*c))
            .map(|c| (c, st.value(c)))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }

    /// Copy the selection to the clipboard. Returns `false` when there was
    /// nothing to copy.
    pub fn copy(&mut self) -> Result<bool> {
        let payload = self.selection_payload();
        if payload.is_empty() {
            return Ok(false);
        }
        let mut st = self.state_mut();
        let contents = ClipboardContents::from_payload(&payload, st.config.text_delimiter);
        st.clipboard.set_contents(contents)?;
        debug!(cells = payload.len(), "copied");
        Ok(true)
    }

    /// Copy, then clear the copied cells that are not read-only.
    pub fn cut(&mut self) -> Result<bool> {
        let payload = self.selection_payload();
        if !self.copy()? {
            return Ok(false);
        }
        self.begin_batch();
        for (coord, _) in payload.iter() {
            if self.is_read_only(coord) {
                continue;
            }
            if let Err(e) = self.set_cell_value(coord, "") {
                self.end_batch();
                return Err(e);
            }
        }
        self.end_batch();
        Ok(true)
    }

    /// Paste the clipboard. Returns the number of cells written.
    pub fn paste(&mut self, target: Option<Coord>) -> Result<usize> {
        let payload = {
            let mut st = self.state_mut();
            let delimiter = st.config.text_delimiter;
            match st.clipboard.contents()? {
                Some(contents) => contents.to_payload(delimiter)?,
                None => return Ok(0),
            }
        };
        self.paste_payload(&payload, target)
    }

    /// Write `payload` so its top-left entry lands on `target`.
    ///
    /// Without an explicit target the top-left of the selection is used,
    /// then the cursor. Gaps in the payload leave cells untouched; entries
    /// falling outside the grid, on covered merged cells or on read-only
    /// cells are skipped.
    pub fn paste_payload(&mut self, payload: &ClipboardPayload, target: Option<Coord>) -> Result<usize> {
        let target = {
            let st = self.state();
            if !st.has_table() {
                return Err(GridError::NotReady);
            }
            if !st.config.editable {
                return Err(GridError::ModeConflict("grid is not editable".to_string()));
            }
            target
                .or_else(|| st.selection.bounding_block().map(|b| b.top_left()))
                .unwrap_or(self.cursor)
        };
        let Some(min) = payload.min_coord() else {
            return Ok(0);
        };
        let save = self.state().config.save_on_editor_switch;
        if !self.disable_edit(save) {
            return Ok(0);
        }

        let moved = payload.translate(target.row - min.row, target.col - min.col);
        let (rows, cols) = (self.number_rows(), self.number_cols());
        let mut written = 0;
        self.begin_batch();
        for (coord, value) in moved.iter() {
            if !coord.is_within(rows, cols) || self.owner_of(coord) != coord || self.is_read_only(coord) {
                continue;
            }
            match self.set_cell_value(coord, value) {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => {
                    self.end_batch();
                    return Err(e);
                }
            }
        }
        self.end_batch();
        info!(row = target.row, col = target.col, written, "pasted");
        Ok(written)
    }
}
