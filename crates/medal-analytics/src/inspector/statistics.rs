//! Descriptive statistics and missing-value diagnostics for a loaded table.

use crate::error::Result;
use crate::types::{ColumnMissing, ColumnType, DatasetReport, NumericSummary};
use crate::utils::{dtype_label, is_numeric_dtype, missing_count, numeric_values};
use polars::prelude::*;
use std::cmp::Ordering;

/// Build the diagnostic report of `df`.
///
/// `top_missing` bounds the "most missing" ranking and `preview_rows` the
/// number of rows rendered in the preview. The table is not modified.
pub fn describe_table(
    df: &DataFrame,
    name: &str,
    sheet_name: Option<&str>,
    top_missing: usize,
    preview_rows: usize,
) -> Result<DatasetReport> {
    let row_count = df.height();

    let column_types = df
        .get_columns()
        .iter()
        .map(|column| ColumnType {
            column: column.name().to_string(),
            dtype: dtype_label(column.dtype()),
        })
        .collect();

    let missing = missing_values(df)?;
    let total_missing = missing.iter().map(|m| m.missing_count).sum();
    let most_missing = rank_missing(&missing, top_missing);

    let mut numeric_summaries = Vec::new();
    for column in df.get_columns() {
        if is_numeric_dtype(column.dtype()) {
            numeric_summaries.push(numeric_summary(column.as_materialized_series())?);
        }
    }

    Ok(DatasetReport {
        name: name.to_string(),
        sheet_name: sheet_name.map(str::to_string),
        row_count,
        column_count: df.width(),
        column_types,
        preview: format!("{}", df.head(Some(preview_rows))),
        numeric_summaries,
        missing,
        total_missing,
        most_missing,
    })
}

/// Missing count and fraction per column, in column order. NaN counts as missing.
pub(crate) fn missing_values(df: &DataFrame) -> Result<Vec<ColumnMissing>> {
    let rows = df.height();
    let mut missing = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let missing_count = missing_count(column.as_materialized_series())?;
        let missing_fraction = if rows == 0 {
            0.0
        } else {
            missing_count as f64 / rows as f64
        };
        missing.push(ColumnMissing {
            column: column.name().to_string(),
            missing_count,
            missing_fraction,
        });
    }
    Ok(missing)
}

/// The `top` columns with the highest missing fraction, descending.
///
/// Ties keep column order.
pub(crate) fn rank_missing(missing: &[ColumnMissing], top: usize) -> Vec<ColumnMissing> {
    let mut ranked = missing.to_vec();
    ranked.sort_by(|a, b| {
        b.missing_fraction
            .partial_cmp(&a.missing_fraction)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top);
    ranked
}

/// count / mean / std / min / quartiles / max over the non-null values.
pub(crate) fn numeric_summary(series: &Series) -> Result<NumericSummary> {
    let mut values = numeric_values(series)?;
    values.sort_by(f64::total_cmp);

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);

    Ok(NumericSummary {
        column: series.name().to_string(),
        count,
        mean,
        std: mean.and_then(|m| sample_std(&values, m)),
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    })
}

/// Sample standard deviation (n - 1 denominator); None below two values.
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Linearly interpolated quantile of already sorted values.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = q * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let weight = pos - lower as f64;
            Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
        }
    }
}
