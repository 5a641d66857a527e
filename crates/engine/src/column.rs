//! Column selection and numeric extraction.
//!
//! A [`ColumnSelector`] names the column to analyze; [`extract_numeric_column`]
//! resolves it against a [`Table`] and coerces every cell in that column,
//! dropping anything that is not a finite number.

use std::fmt;
use std::str::FromStr;

use crate::table::{col_to_letters, letters_to_col, Table};

/// Default analysis target: the third column ("column C")
pub const DEFAULT_COLUMN_INDEX: usize = 2;

/// Number of values shown in a series preview
pub const PREVIEW_LEN: usize = 10;

/// Widest sheet accepted by a selector (XFD, the last Excel column)
pub const MAX_COLUMNS: usize = 16_384;

/// Which column to analyze
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Zero-based position
    Index(usize),
    /// Header text (requires a header row)
    Header(String),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Index(DEFAULT_COLUMN_INDEX)
    }
}

impl FromStr for ColumnSelector {
    type Err = String;

    /// `"2"` is a zero-based index, `"@C"` a column letter, anything else a
    /// header name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty column selector".to_string());
        }
        let idx = if s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse::<usize>().ok()
        } else if let Some(letters) = s.strip_prefix('@') {
            Some(
                letters_to_col(letters)
                    .ok_or_else(|| format!("invalid column letter {:?}", letters))?,
            )
        } else {
            return Ok(ColumnSelector::Header(s.to_string()));
        };
        match idx {
            Some(idx) if idx < MAX_COLUMNS => Ok(ColumnSelector::Index(idx)),
            _ => Err(format!(
                "column {} is out of range (at most {} columns)",
                s, MAX_COLUMNS
            )),
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(idx) => write!(f, "{}", col_to_letters(*idx)),
            ColumnSelector::Header(name) => write!(f, "{:?}", name),
        }
    }
}

/// Column-level failures
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnError {
    /// The table is narrower than the requested index
    InsufficientColumns { index: usize, column_count: usize },
    /// A header selector matched no header
    UnknownColumn { name: String, available: Vec<String> },
    /// The column exists but no cell coerced to a number
    NoNumericData { column: String },
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::InsufficientColumns { index, column_count } => write!(
                f,
                "file doesn't have enough columns (need at least {} for column {}, found {})",
                index.saturating_add(1),
                col_to_letters(*index),
                column_count
            ),
            ColumnError::UnknownColumn { name, .. } => {
                write!(f, "no column with header {:?}", name)
            }
            ColumnError::NoNumericData { column } => {
                write!(f, "no numeric data found in column {}", column)
            }
        }
    }
}

impl std::error::Error for ColumnError {}

/// Finite values taken from one column, in row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericSeries {
    values: Vec<f64>,
}

impl NumericSeries {
    /// Build a series, discarding non-finite values
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().filter(|v| v.is_finite()).collect(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First [`PREVIEW_LEN`] values, plus whether the series was cut short
    pub fn preview(&self) -> (&[f64], bool) {
        let n = self.values.len().min(PREVIEW_LEN);
        (&self.values[..n], self.values.len() > PREVIEW_LEN)
    }

    /// Comma-joined rendering used in prompts
    pub fn to_list_string(&self) -> String {
        self.values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Resolve a selector to a column index on this table
pub fn resolve_column(table: &Table, selector: &ColumnSelector) -> Result<usize, ColumnError> {
    match selector {
        ColumnSelector::Index(index) => {
            if table.column_count() <= *index {
                return Err(ColumnError::InsufficientColumns {
                    index: *index,
                    column_count: table.column_count(),
                });
            }
            Ok(*index)
        }
        ColumnSelector::Header(name) => table.header_index(name).ok_or_else(|| {
            ColumnError::UnknownColumn {
                name: name.clone(),
                available: table
                    .headers()
                    .map(|h| h.iter().filter(|s| !s.is_empty()).cloned().collect())
                    .unwrap_or_default(),
            }
        }),
    }
}

/// Extract the numeric values of the selected column.
///
/// Fails with `InsufficientColumns` before looking at any row when the
/// table is too narrow, and with `NoNumericData` only once the column is
/// known to exist.
pub fn extract_numeric_column(
    table: &Table,
    selector: &ColumnSelector,
) -> Result<NumericSeries, ColumnError> {
    let index = resolve_column(table, selector)?;
    let series = NumericSeries::new(table.column(index).filter_map(|cell| cell.as_number()));

    if series.is_empty() {
        return Err(ColumnError::NoNumericData {
            column: table.column_label(index),
        });
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|s| Cell::from_input(s)).collect()
    }

    fn table_with_third_column(values: &[&str]) -> Table {
        Table::new(values.iter().map(|v| row(&["a", "b", v])).collect())
    }

    #[test]
    fn test_extracts_numeric_column_c() {
        let table = table_with_third_column(&["1", "2", "3", "4"]);
        let series = extract_numeric_column(&table, &ColumnSelector::default()).unwrap();
        assert_eq!(series.values(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_drops_non_numeric_and_empty() {
        let table = table_with_third_column(&["5", "x", "7.5", ""]);
        let series = extract_numeric_column(&table, &ColumnSelector::default()).unwrap();
        assert_eq!(series.values(), &[5.0, 7.5]);
    }

    #[test]
    fn test_typed_cells_are_not_coerced() {
        let table = Table::new(vec![
            vec![Cell::Empty, Cell::Empty, Cell::Bool(true)],
            vec![Cell::Empty, Cell::Empty, Cell::DateTime(45000.0)],
            vec![Cell::Empty, Cell::Empty, Cell::Error("#N/A".to_string())],
            vec![Cell::Empty, Cell::Empty, Cell::Number(9.0)],
        ]);
        let series = extract_numeric_column(&table, &ColumnSelector::Index(2)).unwrap();
        assert_eq!(series.values(), &[9.0]);
    }

    #[test]
    fn test_insufficient_columns_with_rows() {
        let table = Table::new(vec![row(&["1", "2"]), row(&["3", "4"])]);
        let err = extract_numeric_column(&table, &ColumnSelector::default()).unwrap_err();
        assert_eq!(err, ColumnError::InsufficientColumns { index: 2, column_count: 2 });
    }

    #[test]
    fn test_insufficient_columns_with_zero_rows() {
        let table = Table::new(Vec::new());
        let err = extract_numeric_column(&table, &ColumnSelector::default()).unwrap_err();
        assert!(matches!(err, ColumnError::InsufficientColumns { .. }));
    }

    #[test]
    fn test_header_only_table_has_no_numeric_data() {
        // Columns exist (from the header) but there are no data rows
        let table = Table::from_grid_with_header(vec![row(&["a", "b", "c"])]);
        let err = extract_numeric_column(&table, &ColumnSelector::default()).unwrap_err();
        assert_eq!(err, ColumnError::NoNumericData { column: "c".to_string() });
    }

    #[test]
    fn test_all_non_numeric_is_no_numeric_data() {
        let table = table_with_third_column(&["x", "y", ""]);
        let err = extract_numeric_column(&table, &ColumnSelector::default()).unwrap_err();
        assert_eq!(err, ColumnError::NoNumericData { column: "C".to_string() });
    }

    #[test]
    fn test_select_by_header() {
        let table = Table::from_grid_with_header(vec![
            row(&["Name", "Price", "Qty"]),
            row(&["apple", "1.5", "3"]),
            row(&["pear", "2.5", "4"]),
        ]);
        let selector: ColumnSelector = "Price".parse().unwrap();
        let series = extract_numeric_column(&table, &selector).unwrap();
        assert_eq!(series.values(), &[1.5, 2.5]);
    }

    #[test]
    fn test_unknown_header() {
        let table = Table::from_grid_with_header(vec![row(&["Name", "Price", "Qty"])]);
        let err = extract_numeric_column(&table, &ColumnSelector::Header("Cost".to_string()))
            .unwrap_err();
        match err {
            ColumnError::UnknownColumn { name, available } => {
                assert_eq!(name, "Cost");
                assert_eq!(available, vec!["Name", "Price", "Qty"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("2".parse::<ColumnSelector>().unwrap(), ColumnSelector::Index(2));
        assert_eq!("@C".parse::<ColumnSelector>().unwrap(), ColumnSelector::Index(2));
        assert_eq!("@aa".parse::<ColumnSelector>().unwrap(), ColumnSelector::Index(26));
        assert_eq!(
            " Amount ".parse::<ColumnSelector>().unwrap(),
            ColumnSelector::Header("Amount".to_string())
        );
        assert!("".parse::<ColumnSelector>().is_err());
        assert!("@1".parse::<ColumnSelector>().is_err());
    }

    #[test]
    fn test_selector_out_of_range() {
        assert_eq!("16383".parse::<ColumnSelector>().unwrap(), ColumnSelector::Index(16_383));
        assert_eq!("@XFD".parse::<ColumnSelector>().unwrap(), ColumnSelector::Index(16_383));

        let err = "18446744073709551615".parse::<ColumnSelector>().unwrap_err();
        assert!(err.contains("out of range"), "{}", err);
        assert!("99999999999999999999999".parse::<ColumnSelector>().is_err());
        assert!("16384".parse::<ColumnSelector>().is_err());
        assert!("@XFE".parse::<ColumnSelector>().is_err());
        assert!("@ZZZZZZZZZZZZZZZZ".parse::<ColumnSelector>().is_err());
    }

    #[test]
    fn test_huge_index_reports_without_overflow() {
        let table = Table::new(vec![vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Number(3.0)]]);
        let err = extract_numeric_column(&table, &ColumnSelector::Index(usize::MAX)).unwrap_err();
        assert_eq!(
            err,
            ColumnError::InsufficientColumns { index: usize::MAX, column_count: 3 }
        );
        let text = err.to_string();
        assert!(text.contains("found 3"), "{}", text);
        assert!(!ColumnSelector::Index(usize::MAX).to_string().is_empty());
    }

    #[test]
    fn test_preview_truncates() {
        let series = NumericSeries::new((1..=12).map(|n| n as f64));
        let (head, truncated) = series.preview();
        assert_eq!(head.len(), PREVIEW_LEN);
        assert!(truncated);

        let short = NumericSeries::new(vec![1.0, 2.0]);
        assert_eq!(short.preview(), (&[1.0, 2.0][..], false));
    }

    #[test]
    fn test_list_string() {
        let series = NumericSeries::new(vec![1.0, 2.5, -3.0]);
        assert_eq!(series.to_list_string(), "1, 2.5, -3");
    }
}
