// Table readers
//
// `load` is the single entry point: it checks that the path names a readable
// file, picks a reader from the extension, and returns the first sheet as a
// `Table`.

pub mod csv;
pub mod xlsx;

use std::fmt;
use std::path::{Path, PathBuf};

use colstat_engine::cell::Cell;
use colstat_engine::table::Table;

/// Options controlling how a grid becomes a table
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Treat the first non-empty row as column headers
    pub headers: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { headers: true }
    }
}

/// File-level failures
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The path does not resolve to a readable file
    NotFound(PathBuf),
    /// The file exists but could not be read as a table
    Parse { path: PathBuf, message: String },
}

impl LoadError {
    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => write!(f, "file '{}' not found", path.display()),
            LoadError::Parse { path, message } => {
                write!(f, "error reading '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// xlsx, xlsm, xls, xlsb, ods (anything calamine opens)
    Excel,
    Csv,
    Tsv,
}

impl Format {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods") => {
                Some(Format::Excel)
            }
            Some("csv") => Some(Format::Csv),
            Some("tsv") => Some(Format::Tsv),
            _ => None,
        }
    }
}

/// Load the first sheet of a tabular file
pub fn load(path: &Path, options: &ReadOptions) -> Result<Table, LoadError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => return Err(LoadError::NotFound(path.to_path_buf())),
    }

    let format = Format::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)");
        LoadError::parse(path, format!("unsupported file extension {:?}", ext))
    })?;

    let grid = match format {
        Format::Excel => xlsx::read_first_sheet(path)?,
        Format::Csv => csv::read_grid(path, None)?,
        Format::Tsv => csv::read_grid(path, Some(b'\t'))?,
    };

    let table = build_table(grid, options);
    log::info!(
        "loaded {}: {} rows, {} columns",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn build_table(grid: Vec<Vec<Cell>>, options: &ReadOptions) -> Table {
    if options.headers {
        Table::from_grid_with_header(grid)
    } else {
        Table::new(grid)
    }
}
