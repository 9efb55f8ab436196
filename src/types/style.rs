use serde::{Deserialize, Serialize};

/// Font description handed to the host painter and text measurer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    pub family: String,
    pub point_size: u16,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            point_size: 10,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Text direction inside a cell.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Colours are kept as `#RRGGBB` strings and handed to the host untouched.
pub type Color = String;

/// Check that a colour is a `#RRGGBB` or `#RRGGBBAA` hex string.
pub fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 6 || hex.len() == 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FFAA00"));
        assert!(is_hex_color("#ffaa0080"));
        assert!(!is_hex_color("FFAA00"));
        assert!(!is_hex_color("#FFAA0"));
        assert!(!is_hex_color("#GGAA00"));
    }
}
