//! Clipboard payloads and their wire formats.
//!
//! The native format is a linear stream of values separated by two-character
//! escape markers, so sparse selections survive a copy with their gaps:
//!
//! | marker          | meaning                                     |
//! |-----------------|---------------------------------------------|
//! | `ESC n`         | next row (row + 1, column reset)            |
//! | `ESC r <n>:`    | jump to row `n`                             |
//! | `ESC c`         | end of value, column + 1                    |
//! | `ESC j <n>:`    | jump to column `n` (before a row's first value) |
//! | `ESC ESC`       | a literal `ESC` inside a value              |
//!
//! Every native copy is paired with a plain-text rendition (delimiter and
//! newline over the bounding rectangle) for consumers that do not know the
//! native format.

use std::collections::BTreeMap;

use tracing::{trace, warn};

use crate::error::{GridError, Result};
use crate::types::{Block, Coord};

/// Marker lead character.
pub const ESCAPE: char = '\u{1b}';
pub const NEXT_ROW: char = 'n';
pub const NEW_ROW: char = 'r';
pub const NEXT_COL: char = 'c';
pub const NEW_COL: char = 'j';

/// Default plain-text column delimiter.
pub const TEXT_DELIMITER: char = '\t';

/// Sparse row → (column → value) map of one copy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardPayload {
    rows: BTreeMap<i32, BTreeMap<i32, String>>,
}

impl ClipboardPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: Coord, value: impl Into<String>) {
        self.rows
            .entry(coord.row)
            .or_default()
            .insert(coord.col, value.into());
    }

    pub fn get(&self, coord: Coord) -> Option<&str> {
        self.rows.get(&coord.row)?.get(&coord.col).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(BTreeMap::is_empty)
    }

    /// Entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &str)> + '_ {
        self.rows.iter().flat_map(|(r, cols)| {
            cols.iter()
                .map(move |(c, v)| (Coord::new(*r, *c), v.as_str()))
        })
    }

    /// Drop rows whose values are all empty.
    pub fn compact(&mut self) {
        self.rows
            .retain(|_, cols| cols.values().any(|v| !v.is_empty()));
    }

    /// Top-most row and left-most column over all entries.
    pub fn min_coord(&self) -> Option<Coord> {
        let row = *self.rows.iter().find(|(_, c)| !c.is_empty())?.0;
        let col = self.rows.values().filter_map(|c| c.keys().next()).min()?;
        Some(Coord::new(row, *col))
    }

    pub fn bounding_block(&self) -> Option<Block> {
        let min = self.min_coord()?;
        let bottom = *self.rows.iter().rev().find(|(_, c)| !c.is_empty())?.0;
        let right = self.rows.values().filter_map(|c| c.keys().next_back()).max()?;
        Some(Block::from_corners(min, Coord::new(bottom, *right)))
    }

    /// Every entry moved by `(drow, dcol)`.
    pub fn translate(&self, drow: i32, dcol: i32) -> Self {
        let mut out = Self::new();
        for (coord, v) in self.iter() {
            out.insert(coord.offset(drow, dcol), v);
        }
        out
    }
}

impl FromIterator<(Coord, String)> for ClipboardPayload {
    fn from_iter<I: IntoIterator<Item = (Coord, String)>>(iter: I) -> Self {
        let mut p = Self::new();
        for (c, v) in iter {
            p.insert(c, v);
        }
        p
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        if ch == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
}

fn push_jump(out: &mut String, marker: char, n: i32) {
    out.push(ESCAPE);
    out.push(marker);
    out.push_str(&n.to_string());
    out.push(':');
}

/// Encode to the native escape format. Wholly empty rows are dropped first.
pub fn encode_native(payload: &ClipboardPayload) -> String {
    let mut payload = payload.clone();
    payload.compact();

    let mut out = String::new();
    let mut prev_row: Option<i32> = None;
    for (row, cols) in &payload.rows {
        match prev_row {
            Some(p) if *row == p + 1 => {
                out.push(ESCAPE);
                out.push(NEXT_ROW);
            }
            _ => push_jump(&mut out, NEW_ROW, *row),
        }
        prev_row = Some(*row);

        let mut prev_col: Option<i32> = None;
        for (col, value) in cols {
            if prev_col.map_or(true, |p| *col != p + 1) {
                push_jump(&mut out, NEW_COL, *col);
            }
            prev_col = Some(*col);
            push_escaped(&mut out, value);
            out.push(ESCAPE);
            out.push(NEXT_COL);
        }
    }
    out
}

fn read_number(chars: &mut std::str::Chars<'_>) -> Result<i32> {
    let mut digits = String::new();
    loop {
        match chars.next() {
            Some(':') => break,
            Some(d) if d.is_ascii_digit() => digits.push(d),
            Some('-') if digits.is_empty() => digits.push('-'),
            other => {
                return Err(GridError::Clipboard(format!(
                    "bad jump marker near {other:?}"
                )))
            }
        }
    }
    digits
        .parse()
        .map_err(|_| GridError::Clipboard(format!("bad jump target {digits:?}")))
}

/// Decode the native escape format.
///
/// A value left without a trailing NEXT-COL marker is still stored.
pub fn decode_native(data: &str) -> Result<ClipboardPayload> {
    let mut out = ClipboardPayload::new();
    let (mut row, mut col) = (0, 0);
    let mut value = String::new();
    let mut chars = data.chars();

    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some(ESCAPE) => value.push(ESCAPE),
            Some(NEXT_ROW) => {
                row += 1;
                col = 0;
            }
            Some(NEW_ROW) => {
                row = read_number(&mut chars)?;
                col = 0;
            }
            Some(NEXT_COL) => {
                out.insert(Coord::new(row, col), std::mem::take(&mut value));
                col += 1;
            }
            Some(NEW_COL) => col = read_number(&mut chars)?,
            other => {
                warn!(?other, "unknown clipboard marker");
                return Err(GridError::Clipboard(format!("unknown marker {other:?}")));
            }
        }
    }
    if !value.is_empty() {
        out.insert(Coord::new(row, col), value);
    }
    trace!(cells = out.len(), "decoded native clipboard data");
    Ok(out)
}

/// Plain-text rendition over the bounding rectangle.
///
/// Skipped rows and columns are padded with empty fields. Every row ends in a
/// newline. Values containing the delimiter or newlines do not survive.
pub fn encode_text(payload: &ClipboardPayload, delimiter: char) -> String {
    let mut payload = payload.clone();
    payload.compact();
    let Some(bound) = payload.bounding_block() else {
        return String::new();
    };
    let mut out = String::new();
    for row in bound.top..=bound.bottom() {
        for col in bound.left..=bound.right() {
            if col > bound.left {
                out.push(delimiter);
            }
            if let Some(v) = payload.get(Coord::new(row, col)) {
                out.push_str(v);
            }
        }
        out.push('\n');
    }
    out
}

/// Parse delimiter/newline separated text into a payload anchored at (0, 0).
pub fn decode_text(text: &str, delimiter: char) -> ClipboardPayload {
    let mut out = ClipboardPayload::new();
    let body = text.strip_suffix('\n').unwrap_or(text);
    if body.is_empty() {
        return out;
    }
    for (r, line) in (0..).zip(body.split('\n')) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        for (c, field) in (0..).zip(line.split(delimiter)) {
            out.insert(Coord::new(r, c), field);
        }
    }
    out
}

/// What a clipboard holds: the native stream (when written by a grid) and
/// the plain-text fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClipboardContents {
    pub native: Option<String>,
    pub text: String,
}

impl ClipboardContents {
    pub fn from_payload(payload: &ClipboardPayload, delimiter: char) -> Self {
        Self {
            native: Some(encode_native(payload)),
            text: encode_text(payload, delimiter),
        }
    }

    /// Decode, preferring the native stream.
    pub fn to_payload(&self, delimiter: char) -> Result<ClipboardPayload> {
        match &self.native {
            Some(native) => decode_native(native),
            None => Ok(decode_text(&self.text, delimiter)),
        }
    }
}

/// Where copies go and pastes come from.
pub trait ClipboardBackend {
    fn set_contents(&mut self, contents: ClipboardContents) -> Result<()>;
    fn contents(&mut self) -> Result<Option<ClipboardContents>>;
}

/// Process-local clipboard.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<ClipboardContents>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn set_contents(&mut self, contents: ClipboardContents) -> Result<()> {
        self.contents = Some(contents);
        Ok(())
    }

    fn contents(&mut self) -> Result<Option<ClipboardContents>> {
        Ok(self.contents.clone())
    }
}

/// OS clipboard. Only the plain text goes to the OS; the native stream is
/// kept alongside and used while the OS text still matches it.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    last: Option<ClipboardContents>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| GridError::Clipboard(e.to_string()))?;
        Ok(Self { inner, last: None })
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn set_contents(&mut self, contents: ClipboardContents) -> Result<()> {
        self.inner
            .set_text(contents.text.clone())
            .map_err(|e| GridError::Clipboard(e.to_string()))?;
        trace!("copied to system clipboard");
        self.last = Some(contents);
        Ok(())
    }

    fn contents(&mut self) -> Result<Option<ClipboardContents>> {
        let text = match self.inner.get_text() {
            Ok(t) => t,
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(GridError::Clipboard(e.to_string())),
        };
        match &self.last {
            Some(last) if last.text == text => Ok(Some(last.clone())),
            _ => Ok(Some(ClipboardContents { native: None, text })),
        }
    }
}
