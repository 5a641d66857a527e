use serde::{Deserialize, Serialize};

/// A single cell as delivered by a reader.
///
/// Readers keep the type information the source format gives them; numeric
/// coercion happens later, in [`Cell::as_number`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    /// Spreadsheet date/time serial (days since the 1900 epoch)
    DateTime(f64),
    /// Error literal carried over from the source, e.g. `#DIV/0!`
    Error(String),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl Cell {
    /// Build a cell from raw text input (CSV fields, test fixtures).
    ///
    /// Text that reads as a finite number becomes `Number`; everything else
    /// stays `Text`. Blank input is `Empty`.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Cell::Empty;
        }

        match parse_number(trimmed) {
            Some(n) => Cell::Number(n),
            None => Cell::Text(input.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Best-effort numeric coercion.
    ///
    /// Returns `None` for anything that is not a finite number: blanks,
    /// booleans, dates, error literals, and text that does not parse.
    /// Never substitutes zero for a missing value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => parse_number(s.trim()),
            // Booleans are not read as 1/0, unlike a pandas to_numeric pass
            _ => None,
        }
    }

    /// Display text for headers and previews
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.clone(),
            Cell::Bool(b) => if *b { "TRUE".to_string() } else { "FALSE".to_string() },
            Cell::DateTime(serial) => format_number(*serial),
            Cell::Error(e) => e.clone(),
        }
    }
}

/// Parse trimmed text as a finite f64.
///
/// Rust's float parser accepts `inf` and `NaN`; those are rejected here so a
/// coerced value is always usable in arithmetic.
fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Integers without decimals, everything else in shortest round-trip form
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
