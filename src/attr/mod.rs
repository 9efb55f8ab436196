//! Cell attributes: sparse per-cell/row/column styling with merge rules.
//!
//! A [`CellAttr`] is a cheap-to-clone, copy-on-write bag of optional fields.
//! Unset fields fall back along the attribute's `default` chain and finally to
//! a fully populated [`EffectiveAttr`] owned by the grid, so every lookup ends
//! in a value.

mod cache;
mod store;

pub use cache::AttrCache;
pub use store::AttrStore;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::editor::CellEditor;
use crate::render::CellRenderer;
use crate::types::{Color, Font, HAlign, Orientation, VAlign};

/// Which scope an attribute belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKind {
    /// Synthetic merge of cell, row and column attributes. Never stored.
    Any,
    #[default]
    Cell,
    Row,
    Col,
    /// Chained fallback of another attribute.
    Default,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct AttrData {
    text_color: Option<Color>,
    back_color: Option<Color>,
    font: Option<Font>,
    h_align: Option<HAlign>,
    v_align: Option<VAlign>,
    orientation: Option<Orientation>,
    level: Option<i32>,
    read_only: Option<bool>,
    overflow: Option<bool>,
    renderer: Option<CellRenderer>,
    editor: Option<CellEditor>,
    kind: AttrKind,
    default: Option<CellAttr>,
}

/// Copy-on-write cell attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellAttr(Rc<AttrData>);

macro_rules! attr_field {
    ($field:ident, $ty:ty, $set:ident, $has:ident) => {
        pub fn $set(&mut self, value: impl Into<$ty>) -> &mut Self {
            self.data_mut().$field = Some(value.into());
            self
        }

        pub fn $has(&self) -> bool {
            self.0.$field.is_some()
        }
    };
}

impl CellAttr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(kind: AttrKind) -> Self {
        let mut attr = Self::default();
        attr.data_mut().kind = kind;
        attr
    }

    fn data_mut(&mut self) -> &mut AttrData {
        Rc::make_mut(&mut self.0)
    }

    /// Whether two handles share storage (no copy has been made yet).
    pub fn ptr_eq(&self, other: &CellAttr) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    attr_field!(text_color, Color, set_text_color, has_text_color);
    attr_field!(back_color, Color, set_back_color, has_back_color);
    attr_field!(font, Font, set_font, has_font);
    attr_field!(h_align, HAlign, set_h_align, has_h_align);
    attr_field!(v_align, VAlign, set_v_align, has_v_align);
    attr_field!(orientation, Orientation, set_orientation, has_orientation);
    attr_field!(read_only, bool, set_read_only, has_read_only);
    attr_field!(overflow, bool, set_overflow, has_overflow);
    attr_field!(renderer, CellRenderer, set_renderer, has_renderer);
    attr_field!(editor, CellEditor, set_editor, has_editor);

    pub fn kind(&self) -> AttrKind {
        self.0.kind
    }

    pub fn set_kind(&mut self, kind: AttrKind) -> &mut Self {
        if self.0.kind != kind {
            self.data_mut().kind = kind;
        }
        self
    }

    /// Priority level; not inherited from the default chain.
    pub fn level(&self) -> i32 {
        self.0.level.unwrap_or(0)
    }

    pub fn set_level(&mut self, level: i32) -> &mut Self {
        self.data_mut().level = Some(level);
        self
    }

    pub fn default_attr(&self) -> Option<&CellAttr> {
        self.0.default.as_ref()
    }

    pub fn set_default_attr(&mut self, default: Option<CellAttr>) -> &mut Self {
        self.data_mut().default = default;
        self
    }

    /// First value found walking this attribute and its default chain.
    ///
    /// The chain is acyclic: a default is an immutable snapshot taken before
    /// the attribute pointing at it exists.
    fn lookup<T: Clone>(&self, get: impl Fn(&AttrData) -> Option<&T>) -> Option<T> {
        let mut current = Some(self);
        while let Some(attr) = current {
            if let Some(v) = get(&attr.0) {
                return Some(v.clone());
            }
            current = attr.0.default.as_ref();
        }
        None
    }

    pub fn text_color(&self) -> Option<Color> {
        self.lookup(|d| d.text_color.as_ref())
    }

    pub fn back_color(&self) -> Option<Color> {
        self.lookup(|d| d.back_color.as_ref())
    }

    pub fn font(&self) -> Option<Font> {
        self.lookup(|d| d.font.as_ref())
    }

    pub fn h_align(&self) -> Option<HAlign> {
        self.lookup(|d| d.h_align.as_ref())
    }

    pub fn v_align(&self) -> Option<VAlign> {
        self.lookup(|d| d.v_align.as_ref())
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.lookup(|d| d.orientation.as_ref())
    }

    pub fn read_only(&self) -> Option<bool> {
        self.lookup(|d| d.read_only.as_ref())
    }

    pub fn overflow(&self) -> Option<bool> {
        self.lookup(|d| d.overflow.as_ref())
    }

    pub fn renderer(&self) -> Option<CellRenderer> {
        self.lookup(|d| d.renderer.as_ref())
    }

    pub fn editor(&self) -> Option<CellEditor> {
        self.lookup(|d| d.editor.as_ref())
    }

    /// Overwrite every field explicitly set in `other`.
    ///
    /// `other`'s default is adopted only when this attribute has none.
    pub fn update_with(&mut self, other: &CellAttr) {
        let src = &other.0;
        let dst = self.data_mut();
        if src.text_color.is_some() {
            dst.text_color.clone_from(&src.text_color);
        }
        if src.back_color.is_some() {
            dst.back_color.clone_from(&src.back_color);
        }
        if src.font.is_some() {
            dst.font.clone_from(&src.font);
        }
        if src.h_align.is_some() {
            dst.h_align = src.h_align;
        }
        if src.v_align.is_some() {
            dst.v_align = src.v_align;
        }
        if src.orientation.is_some() {
            dst.orientation = src.orientation;
        }
        if src.read_only.is_some() {
            dst.read_only = src.read_only;
        }
        if src.overflow.is_some() {
            dst.overflow = src.overflow;
        }
        if src.renderer.is_some() {
            dst.renderer.clone_from(&src.renderer);
        }
        if src.editor.is_some() {
            dst.editor.clone_from(&src.editor);
        }
        if dst.default.is_none() && src.default.is_some() {
            dst.default.clone_from(&src.default);
        }
    }

    /// Fill only the fields still unset here from `other`.
    pub fn merge_with(&mut self, other: &CellAttr) {
        let src = &other.0;
        let dst = self.data_mut();
        if dst.text_color.is_none() {
            dst.text_color.clone_from(&src.text_color);
        }
        if dst.back_color.is_none() {
            dst.back_color.clone_from(&src.back_color);
        }
        if dst.font.is_none() {
            dst.font.clone_from(&src.font);
        }
        if dst.h_align.is_none() {
            dst.h_align = src.h_align;
        }
        if dst.v_align.is_none() {
            dst.v_align = src.v_align;
        }
        if dst.orientation.is_none() {
            dst.orientation = src.orientation;
        }
        if dst.read_only.is_none() {
            dst.read_only = src.read_only;
        }
        if dst.overflow.is_none() {
            dst.overflow = src.overflow;
        }
        if dst.renderer.is_none() {
            dst.renderer.clone_from(&src.renderer);
        }
        if dst.editor.is_none() {
            dst.editor.clone_from(&src.editor);
        }
        if dst.default.is_none() {
            dst.default.clone_from(&src.default);
        }
    }

    /// Resolve every field, falling back to `root` at the end of the chain.
    ///
    /// Renderer and editor are left to the caller, which consults the type
    /// registry before the root.
    pub fn effective(&self, root: &EffectiveAttr) -> EffectiveAttr {
        EffectiveAttr {
            text_color: self.text_color().unwrap_or_else(|| root.text_color.clone()),
            back_color: self.back_color().unwrap_or_else(|| root.back_color.clone()),
            font: self.font().unwrap_or_else(|| root.font.clone()),
            h_align: self.h_align().unwrap_or(root.h_align),
            v_align: self.v_align().unwrap_or(root.v_align),
            orientation: self.orientation().unwrap_or(root.orientation),
            read_only: self.read_only().unwrap_or(root.read_only),
            overflow: self.overflow().unwrap_or(root.overflow),
            renderer: self.renderer().unwrap_or_else(|| root.renderer.clone()),
            editor: self.editor().unwrap_or_else(|| root.editor.clone()),
        }
    }
}

/// Fully resolved attribute. Also the shape of the grid's root defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectiveAttr {
    pub text_color: Color,
    pub back_color: Color,
    pub font: Font,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub orientation: Orientation,
    pub read_only: bool,
    pub overflow: bool,
    #[serde(skip)]
    pub renderer: CellRenderer,
    #[serde(skip)]
    pub editor: CellEditor,
}

impl Default for EffectiveAttr {
    fn default() -> Self {
        Self {
            text_color: "#000000".to_string(),
            back_color: "#FFFFFF".to_string(),
            font: Font::default(),
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            orientation: Orientation::Horizontal,
            read_only: false,
            overflow: true,
            renderer: CellRenderer::Text,
            editor: CellEditor::default(),
        }
    }
}

impl EffectiveAttr {
    /// Defaults for row/column labels.
    pub fn label_defaults() -> Self {
        Self {
            back_color: "#F0F0F0".to_string(),
            font: Font {
                bold: true,
                ..Font::default()
            },
            h_align: HAlign::Center,
            v_align: VAlign::Center,
            overflow: false,
            read_only: true,
            ..Self::default()
        }
    }
}
