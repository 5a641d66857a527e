// Summary statistics over a numeric series

use serde::Serialize;

use crate::column::NumericSeries;

/// Count, sum, extremes and arithmetic mean of a series.
///
/// `min`/`max` are `None` only for the empty series, which the extraction
/// pipeline never produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub count: usize,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: f64,
}

/// Summarize a series.
///
/// Summation is direct left-to-right. An empty series yields count 0 and a
/// mean of 0.0 rather than an error.
pub fn summarize(series: &NumericSeries) -> SummaryStats {
    let values = series.values();

    if values.is_empty() {
        return SummaryStats {
            count: 0,
            sum: 0.0,
            min: None,
            max: None,
            mean: 0.0,
        };
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStats {
        count,
        sum,
        min: Some(min),
        max: Some(max),
        mean: sum / count as f64,
    }
}

/// Mean alone, for callers that only need the fallback value
pub fn mean(series: &NumericSeries) -> f64 {
    summarize(series).mean
}
