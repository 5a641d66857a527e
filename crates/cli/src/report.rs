// Human-readable and JSON report output

use std::io::{self, Write};
use std::path::Path;

use colstat_ai::RemoteEstimate;
use colstat_engine::column::NumericSeries;
use colstat_engine::stats::SummaryStats;
use colstat_engine::table::Table;

/// Remote and local averages closer than this count as a match
pub const MATCH_TOLERANCE: f64 = 0.01;

pub fn values_match(remote: f64, local: f64) -> bool {
    (remote - local).abs() < MATCH_TOLERANCE
}

pub fn write_banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(30))
}

pub fn write_loaded(out: &mut impl Write, path: &Path, table: &Table) -> io::Result<()> {
    writeln!(
        out,
        "Loaded {}: {} rows, {} columns",
        path.display(),
        table.row_count(),
        table.column_count()
    )
}

pub fn write_found(out: &mut impl Write, series: &NumericSeries, label: &str) -> io::Result<()> {
    writeln!(out, "Found {} numeric values in column {}", series.len(), label)?;
    let (head, truncated) = series.preview();
    writeln!(
        out,
        "Data from column {}: {:?}{}",
        label,
        head,
        if truncated { "..." } else { "" }
    )
}

pub fn write_results(out: &mut impl Write, stats: &SummaryStats) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Results:")?;
    writeln!(out, "Number of values: {}", stats.count)?;
    writeln!(out, "Average value: {:.2}", stats.mean)?;
    writeln!(out, "Sum: {:.2}", stats.sum)?;
    if let Some(min) = stats.min {
        writeln!(out, "Min: {:.2}", min)?;
    }
    if let Some(max) = stats.max {
        writeln!(out, "Max: {:.2}", max)?;
    }
    Ok(())
}

pub fn write_comparison(
    out: &mut impl Write,
    estimate: &RemoteEstimate,
    local_mean: f64,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Remote average: {:.2} ({})", estimate.value, estimate.source.as_str())?;
    writeln!(out, "Local average:  {:.2}", local_mean)?;
    if values_match(estimate.value, local_mean) {
        writeln!(out, "Comparison: match (difference < {})", MATCH_TOLERANCE)
    } else {
        writeln!(
            out,
            "Comparison: mismatch (difference {:.2})",
            (estimate.value - local_mean).abs()
        )
    }
}

/// Machine-readable summary for `--json`
pub fn stats_json(
    path: &Path,
    table: &Table,
    label: &str,
    stats: &SummaryStats,
) -> serde_json::Value {
    serde_json::json!({
        "file": path.display().to_string(),
        "rows": table.row_count(),
        "columns": table.column_count(),
        "column": label,
        "count": stats.count,
        "sum": stats.sum,
        "min": stats.min,
        "max": stats.max,
        "mean": stats.mean,
    })
}

/// `stats_json` plus the remote estimate and comparison
pub fn remote_json(
    path: &Path,
    table: &Table,
    label: &str,
    stats: &SummaryStats,
    estimate: &RemoteEstimate,
) -> serde_json::Value {
    let mut value = stats_json(path, table, label, stats);
    value["remote"] = serde_json::json!({
        "value": estimate.value,
        "source": estimate.source,
        "warnings": estimate.warnings,
    });
    value["match"] = serde_json::Value::Bool(values_match(estimate.value, stats.mean));
    value
}
