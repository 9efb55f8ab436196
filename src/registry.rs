//! Data type registry: type name → default renderer and editor.
//!
//! Lookup order:
//! 1. Exact registered name
//! 2. One of the built-in names, registered lazily on first use
//! 3. `base:params`: resolve `base`, clone it, apply `params` to the clone
//!    and register it under the full name
//! 4. [`GridError::TypeNotFound`]

use std::collections::HashMap;

use tracing::debug;

use crate::editor::CellEditor;
use crate::error::{GridError, Result};
use crate::render::CellRenderer;

pub const GRID_VALUE_STRING: &str = "string";
pub const GRID_VALUE_BOOL: &str = "bool";
pub const GRID_VALUE_NUMBER: &str = "long";
pub const GRID_VALUE_FLOAT: &str = "double";
pub const GRID_VALUE_CHOICE: &str = "choice";
pub const GRID_VALUE_AUTOWRAP: &str = "autowrap";

/// Renderer/editor pair registered for one type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub renderer: CellRenderer,
    pub editor: CellEditor,
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeEntry>,
}

fn builtin(name: &str) -> Option<TypeEntry> {
    let (renderer, editor) = match name {
        GRID_VALUE_STRING => (CellRenderer::Text, CellEditor::Text { max_len: None }),
        GRID_VALUE_BOOL => (CellRenderer::Bool, CellEditor::Bool),
        GRID_VALUE_NUMBER => (
            CellRenderer::Number,
            CellEditor::Number {
                min: None,
                max: None,
            },
        ),
        GRID_VALUE_FLOAT => (
            CellRenderer::Float {
                width: None,
                precision: None,
            },
            CellEditor::Float {
                width: None,
                precision: None,
            },
        ),
        GRID_VALUE_CHOICE => (
            CellRenderer::Text,
            CellEditor::Choice {
                choices: Vec::new(),
                allow_others: false,
            },
        ),
        GRID_VALUE_AUTOWRAP => (CellRenderer::AutoWrap, CellEditor::Text { max_len: None }),
        _ => return None,
    };
    Some(TypeEntry { renderer, editor })
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a type.
    pub fn register(&mut self, name: &str, renderer: CellRenderer, editor: CellEditor) {
        debug!(name, "registering data type");
        self.types
            .insert(name.to_string(), TypeEntry { renderer, editor });
    }

    /// Whether `name` is registered already (built-ins count once used).
    pub fn is_registered(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Find the entry for `name`, registering built-in and parameterized
    /// variants on the way.
    pub fn lookup(&mut self, name: &str) -> Result<&TypeEntry> {
        if !self.types.contains_key(name) {
            let entry = self.derive(name)?;
            self.register(name, entry.renderer, entry.editor);
        }
        self.types
            .get(name)
            .ok_or_else(|| GridError::TypeNotFound(name.to_string()))
    }

    fn derive(&mut self, name: &str) -> Result<TypeEntry> {
        if let Some(entry) = builtin(name) {
            return Ok(entry);
        }
        let Some((base, params)) = name.split_once(':') else {
            return Err(GridError::TypeNotFound(name.to_string()));
        };
        let mut entry = self.lookup(base)?.clone();
        entry.renderer.set_parameters(params);
        entry.editor.set_parameters(params);
        Ok(entry)
    }

    pub fn renderer(&mut self, name: &str) -> Result<CellRenderer> {
        self.lookup(name).map(|e| e.renderer.clone())
    }

    pub fn editor(&mut self, name: &str) -> Result<CellEditor> {
        self.lookup(name).map(|e| e.editor.clone())
    }
}
