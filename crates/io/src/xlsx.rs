// Excel reader (xlsx, xlsm, xls, xlsb, ods)
//
// Only the first sheet is read. Cells keep the type calamine reports; dates
// keep their serial value so they are never mistaken for plain numbers.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use colstat_engine::cell::Cell;

use crate::LoadError;

/// Read the first sheet of a workbook into a grid of cells.
///
/// Data that does not begin at A1 keeps its absolute column position, so
/// leading empty columns still count. Leading empty rows are not materialized.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<Cell>>, LoadError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| LoadError::parse(path, format!("failed to open Excel file: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::parse(path, "Excel file contains no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::parse(path, format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Ok(Vec::new());
    }

    // Range start offset (data may not begin at A1)
    let (_, data_start_col) = range.start().unwrap_or((0, 0));
    let col_offset = data_start_col as usize;

    let grid = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; col_offset];
            cells.extend(row.iter().map(convert_cell));
            cells
        })
        .collect();

    Ok(grid)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Error(format!("#{:?}", e)),
        Data::DateTime(dt) => Cell::DateTime(dt.as_f64()),
        // ISO strings stay text; they are not numeric values
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
