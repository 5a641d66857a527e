// CSV/TSV reader

use std::io::Read;
use std::path::Path;

use colstat_engine::cell::Cell;

use crate::LoadError;

/// Read a delimited file into a grid of cells.
///
/// When `delimiter` is None it is sniffed from the first lines.
pub fn read_grid(path: &Path, delimiter: Option<u8>) -> Result<Vec<Vec<Cell>>, LoadError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&content));
    grid_from_string(&content, delimiter).map_err(|e| LoadError::parse(path, e))
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // More columns breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::parse(path, e.to_string()),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| LoadError::parse(path, e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn grid_from_string(content: &str, delimiter: u8) -> Result<Vec<Vec<Cell>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("line {}: {}", row_idx + 1, e))?;
        grid.push(record.iter().map(Cell::from_input).collect());
    }
    Ok(grid)
}
