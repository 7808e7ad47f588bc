//! Shared utilities for the aggregator, queries and inspector.
//!
//! This module contains common helper functions used across multiple modules
//! to reduce code duplication and ensure consistency.

use crate::error::{AnalyticsError, Result};
use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for reporting purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

/// Human-readable dtype label, e.g. `i64`, `f64`, `str`.
pub fn dtype_label(dtype: &DataType) -> String {
    format!("{}", dtype)
}

// =============================================================================
// Column Utilities
// =============================================================================

/// Fail with [`AnalyticsError::ColumnNotFound`] if `column` is not in `df`.
pub fn require_column(df: &DataFrame, column: &str) -> Result<()> {
    if df.schema().contains(column) {
        Ok(())
    } else {
        Err(AnalyticsError::ColumnNotFound(column.to_string()))
    }
}

/// Non-missing values of a numeric column as `f64`, in row order.
///
/// Nulls and NaN are both skipped.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.drop_nulls().cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect())
}

/// Number of missing cells in a column: nulls, plus NaN in float columns.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    if !series.dtype().is_float() {
        return Ok(series.null_count());
    }
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .filter(|v| v.is_none_or(f64::is_nan))
        .count())
}

/// Replace NaN with null in every float column so null-based operations see it as missing.
pub fn nan_to_null(df: &DataFrame) -> PolarsResult<DataFrame> {
    let float_columns: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype().is_float())
        .map(|column| col(column.name().clone()).fill_nan(lit(NULL)))
        .collect();

    if float_columns.is_empty() {
        return Ok(df.clone());
    }
    df.clone().lazy().with_columns(float_columns).collect()
}

/// Non-null values of a column rendered as strings, in row order.
pub fn string_values(series: &Series) -> PolarsResult<Vec<String>> {
    let str_series = series.drop_nulls().cast(&DataType::String)?;
    Ok(str_series
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
