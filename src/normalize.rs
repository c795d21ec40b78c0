//! Cell value normalization.
//!
//! Every check compares cells through two canonical forms: the trimmed
//! string rendering and, when the text is fully numeric, its finite value.

use crate::models::Cell;

/// Canonical forms of a single cell
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCell {
    /// Trimmed string form; empty for blank or absent cells
    pub text: String,
    /// Finite numeric value when `text` is a complete decimal number
    pub number: Option<f64>,
}

impl NormalizedCell {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Normalize a possibly absent cell
pub fn normalize(cell: Option<&Cell>) -> NormalizedCell {
    let text = cell.map(canonical_string).unwrap_or_default();
    let number = parse_numeric(&text);
    NormalizedCell { text, number }
}

/// Trimmed string form of a cell
///
/// Numbers use the shortest representation that round-trips, so `5.0`
/// renders as `5` and `-2.5` as `-2.5`.
pub fn canonical_string(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(text) => text.trim().to_string(),
        Cell::Number(value) => format_number(*value),
        Cell::Bool(value) => value.to_string(),
    }
}

/// Parse a trimmed decimal string, rejecting partial, NaN and infinite values
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !looks_decimal(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapse negative zero
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Rust's float parser also accepts `inf`, `infinity` and `nan`; only digits,
/// sign, decimal point and exponent are allowed here.
fn looks_decimal(text: &str) -> bool {
    !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}
