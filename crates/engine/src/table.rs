// In-memory table produced by a reader
//
// Rows are stored as loaded. Once built a table is never mutated; the reader
// hands it to the caller, which owns it for the rest of the run.

use crate::cell::Cell;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Header row, if the source had one (not counted in `row_count`)
    headers: Option<Vec<String>>,
    rows: Vec<Vec<Cell>>,
    column_count: usize,
}

impl Table {
    /// Build a table without a header row
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let column_count = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self { headers: None, rows, column_count }
    }

    /// Build a table whose first source row was a header row
    pub fn with_headers(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let widest_row = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let column_count = widest_row.max(headers.len());
        Self { headers: Some(headers), rows, column_count }
    }

    /// Split a grid into header + data rows.
    ///
    /// The first row with any non-empty cell becomes the header row; blank
    /// rows above it are discarded. A grid with no such row yields an empty
    /// table with an empty header.
    pub fn from_grid_with_header(mut grid: Vec<Vec<Cell>>) -> Self {
        let Some(header_at) = grid.iter().position(|r| r.iter().any(|c| !c.is_empty())) else {
            return Self::with_headers(Vec::new(), Vec::new());
        };
        let mut rows = grid.split_off(header_at);
        let header_row = rows.remove(0);
        let headers = header_row.iter().map(|c| c.display().trim().to_string()).collect();
        Self::with_headers(headers, rows)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn headers(&self) -> Option<&[String]> {
        self.headers.as_deref()
    }

    /// Cell at (row, col). Ragged rows read as empty past their end.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Iterate the cells of one column, top to bottom
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }

    /// Index of the first header equal to `name` (both sides trimmed)
    pub fn header_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers
            .as_ref()?
            .iter()
            .position(|h| h.trim() == name)
    }

    /// Label for a column: its header when present, otherwise its letter
    pub fn column_label(&self, col: usize) -> String {
        match self.headers.as_ref().and_then(|h| h.get(col)) {
            Some(h) if !h.is_empty() => h.clone(),
            _ => col_to_letters(col),
        }
    }
}

/// Convert 0-based column index to letters (0 -> A, 25 -> Z, 26 -> AA)
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col.saturating_add(1);
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    result
}

/// Convert column letters to a 0-based index (A -> 0, AA -> 26).
/// Case-insensitive. Returns None for empty or non-alphabetic input.
pub fn letters_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut n: usize = 0;
    for c in letters.chars() {
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }
    Some(n - 1)
}
