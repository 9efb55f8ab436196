//! Validation of edited text before it reaches the table.
//!
//! Each editor accepts a different shape of value:
//! - Text → unchanged (cut at `max_len`)
//! - Number → integer inside `[min, max]`, stored without padding
//! - Float → parseable as f64, stored at the editor precision when set
//! - Bool → `"1"` or `"0"`
//! - Choice → one of the choices unless others are allowed

use super::input::CellEditor;
use crate::render::is_true;

/// Normalize `text` for storage, or `None` if the editor rejects it.
///
/// Empty text is always accepted and clears the cell.
pub(crate) fn normalize_value(editor: &CellEditor, text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() && !matches!(editor, CellEditor::Bool) {
        return Some(String::new());
    }
    match editor {
        CellEditor::Text { max_len } => Some(match max_len {
            Some(n) => text.chars().take(*n).collect(),
            None => text.to_string(),
        }),
        CellEditor::Number { min, max } => {
            let n = trimmed.parse::<i64>().ok()?;
            let in_range = min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi);
            in_range.then(|| n.to_string())
        }
        CellEditor::Float { precision, .. } => {
            let v = trimmed.parse::<f64>().ok().filter(|v| v.is_finite())?;
            Some(match precision {
                Some(p) => format!("{v:.p$}", p = usize::from(*p)),
                None => trimmed.to_string(),
            })
        }
        CellEditor::Bool => Some(if is_true(trimmed) { "1" } else { "0" }.to_string()),
        CellEditor::Choice {
            choices,
            allow_others,
        } => (*allow_others || choices.iter().any(|c| c == trimmed)).then(|| trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CellEditor::Text { max_len: Some(2) }, "hello", Some("he") ; "text cut")]
    #[test_case(CellEditor::Text { max_len: None }, " keep ", Some(" keep ") ; "text verbatim")]
    #[test_case(CellEditor::Number { min: None, max: None }, " 007", Some("7") ; "number normalized")]
    #[test_case(CellEditor::Number { min: Some(1), max: None }, "0", None ; "number below min")]
    #[test_case(CellEditor::Number { min: None, max: None }, "1.5", None ; "number rejects float")]
    #[test_case(CellEditor::Float { width: None, precision: Some(2) }, "1.5", Some("1.50") ; "float precision")]
    #[test_case(CellEditor::Float { width: None, precision: None }, "nan", None ; "float rejects nan")]
    #[test_case(CellEditor::Bool, "", Some("0") ; "bool empty is false")]
    #[test_case(CellEditor::Bool, "yes", Some("1") ; "bool truthy")]
    #[test_case(CellEditor::Number { min: Some(1), max: Some(2) }, "", Some("") ; "empty clears")]
    fn test_normalize(editor: CellEditor, text: &str, expected: Option<&str>) {
        assert_eq!(normalize_value(&editor, text).as_deref(), expected);
    }

    #[test]
    fn test_choice() {
        let strict = CellEditor::Choice {
            choices: vec!["a".into(), "b".into()],
            allow_others: false,
        };
        assert_eq!(normalize_value(&strict, "b").as_deref(), Some("b"));
        assert_eq!(normalize_value(&strict, "c"), None);
        let open = CellEditor::Choice {
            choices: Vec::new(),
            allow_others: true,
        };
        assert_eq!(normalize_value(&open, "c").as_deref(), Some("c"));
    }
}
