//! Grid configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "defaultRowHeight": 30, "selectionMode": "rows", "editable": false }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::attr::EffectiveAttr;
use crate::clipboard::TEXT_DELIMITER;
use crate::error::Result;
use crate::selection::SelectionMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub default_row_height: i32,
    pub default_col_width: i32,
    /// Rows cannot be sized below this.
    pub min_row_height: i32,
    /// Columns cannot be sized below this.
    pub min_col_width: i32,
    /// Width of the row label column; 0 hides it.
    pub row_label_width: i32,
    /// Height of the column label row; 0 hides it.
    pub col_label_height: i32,
    pub editable: bool,
    pub selection_mode: SelectionMode,
    /// Save the active editor's value when editing moves to another cell.
    pub save_on_editor_switch: bool,
    /// Column delimiter of the plain-text clipboard format.
    pub text_delimiter: char,
    /// Root attribute every cell lookup falls back to.
    pub cell_defaults: EffectiveAttr,
    /// Root attribute of row/column labels and the corner.
    pub label_defaults: EffectiveAttr,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_row_height: 25,
            default_col_width: 80,
            min_row_height: 15,
            min_col_width: 15,
            row_label_width: 82,
            col_label_height: 32,
            editable: true,
            selection_mode: SelectionMode::Cells,
            save_on_editor_switch: true,
            text_delimiter: TEXT_DELIMITER,
            cell_defaults: EffectiveAttr::default(),
            label_defaults: EffectiveAttr::label_defaults(),
        }
    }
}

impl GridConfig {
    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        Ok(config.sanitized())
    }

    /// Load from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Problems with the configured sizes. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.default_row_height < self.min_row_height {
            errors.push(format!(
                "defaultRowHeight {} is below minRowHeight {}",
                self.default_row_height, self.min_row_height
            ));
        }
        if self.default_col_width < self.min_col_width {
            errors.push(format!(
                "defaultColWidth {} is below minColWidth {}",
                self.default_col_width, self.min_col_width
            ));
        }
        if self.min_row_height < 0 || self.min_col_width < 0 {
            errors.push("minimum sizes must not be negative".to_string());
        }
        if self.row_label_width < 0 || self.col_label_height < 0 {
            errors.push("label sizes must not be negative".to_string());
        }
        errors
    }

    /// Clamp sizes into a consistent state, logging what was changed.
    pub fn sanitized(mut self) -> Self {
        for problem in self.validate() {
            warn!(%problem, "adjusting grid config");
        }
        self.min_row_height = self.min_row_height.max(0);
        self.min_col_width = self.min_col_width.max(0);
        self.default_row_height = self.default_row_height.max(self.min_row_height);
        self.default_col_width = self.default_col_width.max(self.min_col_width);
        self.row_label_width = self.row_label_width.max(0);
        self.col_label_height = self.col_label_height.max(0);
        self
    }
}
