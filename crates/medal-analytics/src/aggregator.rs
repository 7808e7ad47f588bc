//! Medal aggregation over result-record tables.
//!
//! A result-record table has one row per athlete/event outcome and a `Medal`
//! column holding `Gold`, `Silver`, `Bronze` or null. Aggregation partitions
//! the rows by one or more grouping columns and counts each medal kind per
//! partition:
//!
//! | Year | Gold | Silver | Bronze | Total |
//! |------|------|--------|--------|-------|
//! | 2000 | 1    | 1      | 0      | 2     |
//! | 2004 | 0    | 0      | 0      | 0     |
//!
//! Every key present in the input appears in the output, including keys whose
//! rows record no medal. The output is sorted by the grouping columns with
//! nulls last.

use crate::error::{AnalyticsError, Result, ResultExt};
use crate::types::{MEDAL_COLUMN, MedalKind, TOTAL_COLUMN};
use polars::prelude::*;
use tracing::debug;

/// Count Gold/Silver/Bronze/Total medals per distinct combination of `group_by`.
///
/// `group_by` is a non-empty ordered list of column names; the output holds
/// those columns in the same order followed by `Gold`, `Silver`, `Bronze`
/// and `Total` (`UInt32`). Repeated names are collapsed.
///
/// # Errors
///
/// - [`AnalyticsError::InvalidGroupingKey`] if `group_by` is empty or names a
///   column that is not in `df`
/// - [`AnalyticsError::ColumnNotFound`] if `df` has no `Medal` column
///
/// # Example
///
/// ```rust,ignore
/// let by_year = count_medals(&athletes, &["Year"])?;
/// let by_noc_and_year = count_medals(&athletes, &["NOC", "Year"])?;
/// ```
pub fn count_medals(df: &DataFrame, group_by: &[&str]) -> Result<DataFrame> {
    let keys = dedup_keys(group_by);
    if keys.is_empty() {
        return Err(AnalyticsError::InvalidGroupingKey(
            "at least one grouping column is required".to_string(),
        ));
    }

    let schema = df.schema();
    if let Some(missing) = keys.iter().find(|key| !schema.contains(key)) {
        return Err(AnalyticsError::InvalidGroupingKey(missing.to_string()));
    }
    if !schema.contains(MEDAL_COLUMN) {
        return Err(AnalyticsError::ColumnNotFound(MEDAL_COLUMN.to_string()));
    }

    debug!("Counting medals over {} rows by {:?}", df.height(), keys);

    let key_exprs: Vec<Expr> = keys.iter().map(|key| col(*key)).collect();
    let medal = col(MEDAL_COLUMN).cast(DataType::String);

    let counts: Vec<Expr> = MedalKind::ALL
        .iter()
        .map(|kind| {
            medal
                .clone()
                .eq(lit(kind.column_name()))
                .sum()
                .cast(DataType::UInt32)
                .alias(kind.column_name())
        })
        .collect();

    let total = MedalKind::ALL
        .iter()
        .map(|kind| col(kind.column_name()))
        .reduce(|acc, count| acc + count)
        .map(|sum| sum.alias(TOTAL_COLUMN));

    let mut lazy = df.clone().lazy().group_by(key_exprs.clone()).agg(counts);
    if let Some(total) = total {
        lazy = lazy.with_column(total);
    }

    lazy.sort_by_exprs(
        key_exprs,
        SortMultipleOptions::default()
            .with_nulls_last(true)
            .with_maintain_order(true),
    )
    .collect()
    .context(format!("Counting medals by {:?}", keys))
}

/// Count medals by a primary attribute plus any number of further attributes.
///
/// The primary attribute always comes first in the output, whatever its
/// position among `others`. This is the form used for "by Year",
/// "by Year and Season", "by Sport" or "by NOC and Year" views.
pub fn count_medals_n(df: &DataFrame, primary: &str, others: &[&str]) -> Result<DataFrame> {
    let mut keys = Vec::with_capacity(others.len() + 1);
    keys.push(primary);
    keys.extend(others.iter().copied().filter(|key| *key != primary));
    count_medals(df, &keys)
}

fn dedup_keys<'a>(group_by: &[&'a str]) -> Vec<&'a str> {
    let mut keys: Vec<&str> = Vec::with_capacity(group_by.len());
    for key in group_by {
        if !keys.contains(key) {
            keys.push(*key);
        }
    }
    keys
}
