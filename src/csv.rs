//! Minimal CSV/TSV reader that fills a [`StringTable`].

use std::path::Path;

use tracing::debug;

use crate::table::StringTable;

/// Field separator of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// `.csv` reads as comma separated, anything else as tab separated.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Comma,
            _ => Self::Tab,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Parse delimited bytes into a table. Blank lines still count as rows;
/// the widest line sets the column count.
pub fn parse_delimited(data: &[u8], delim: Delimiter) -> StringTable {
    let text = String::from_utf8_lossy(data);
    let sep = delim.as_char();
    let mut rows: Vec<Vec<String>> = text.lines().map(|line| split_line(line, sep)).collect();
    while rows.last().is_some_and(|r| r.iter().all(String::is_empty)) {
        rows.pop();
    }
    debug!(rows = rows.len(), ?delim, "parsed delimited text");
    StringTable::from_rows(rows)
}

/// Split one line respecting quoted fields.
fn split_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}
