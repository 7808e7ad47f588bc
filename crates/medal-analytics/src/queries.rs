//! Filters, joins and rankings applied around medal aggregation.
//!
//! These are the reshaping steps a dashboard performs before handing a table
//! to a chart: narrowing the results to one sport, region or sex, attaching
//! NOC lookups, cutting a year window and ranking summaries. Every function
//! is pure and returns a new table.

use crate::error::{Result, ResultExt};
use crate::types::{MedalColumn, MedalTotals};
use crate::utils::{require_column, string_values};
use polars::prelude::*;
use std::collections::BTreeSet;

/// Dropdown sentinel selecting every sport.
pub const ALL_SPORTS: &str = "All Sports";
/// Dropdown sentinel selecting every region.
pub const ALL_REGIONS: &str = "All regions";
/// Radio sentinel selecting both sexes.
pub const BOTH_SEXES: &str = "Both";

/// Column of the NOC code in result records and lookups.
pub const NOC_COLUMN: &str = "NOC";
/// Column of the region name in the NOC region lookup.
pub const REGION_COLUMN: &str = "region";

/// A dropdown or radio choice: everything, or one value of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Only(String),
}

impl Selection {
    /// Interpret a widget value, treating `all_label` as "no filter".
    pub fn from_widget(value: &str, all_label: &str) -> Self {
        if value == all_label {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }
}

/// Rows where `column` equals `value`, compared as strings.
pub fn filter_equals(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame> {
    require_column(df, column)?;
    df.clone()
        .lazy()
        .filter(col(column).cast(DataType::String).eq(lit(value)))
        .collect()
        .context(format!("Filtering {} == {}", column, value))
}

/// Apply a widget selection to `column`; `Selection::All` returns the table unchanged.
pub fn apply_selection(df: &DataFrame, column: &str, selection: &Selection) -> Result<DataFrame> {
    match selection {
        Selection::All => {
            require_column(df, column)?;
            Ok(df.clone())
        }
        Selection::Only(value) => filter_equals(df, column, value),
    }
}

/// Rows whose `column` is not null.
pub fn drop_missing(df: &DataFrame, column: &str) -> Result<DataFrame> {
    require_column(df, column)?;
    df.clone()
        .lazy()
        .filter(col(column).is_not_null())
        .collect()
        .context(format!("Dropping rows with missing {}", column))
}

/// Attach the NOC region lookup to result records (left join on `NOC`).
///
/// Records whose NOC has no region keep a null `region`.
pub fn join_regions(athletes: &DataFrame, regions: &DataFrame) -> Result<DataFrame> {
    left_join_on_noc(athletes, regions).context("Joining NOC regions")
}

/// Attach ISO codes and country names to a NOC/Year medal summary.
///
/// A leading unnamed index column in the lookup (as left behind by tools that
/// write their row index) is dropped first. The result is sorted by `Year`
/// then `NOC`.
pub fn join_iso_codes(summary: &DataFrame, iso: &DataFrame) -> Result<DataFrame> {
    require_column(summary, "Year")?;
    let iso = strip_index_column(iso);

    let joined = left_join_on_noc(summary, &iso).context("Joining NOC ISO codes")?;
    joined
        .lazy()
        .sort_by_exprs(
            [col("Year"), col(NOC_COLUMN)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
        .context("Sorting by Year and NOC")
}

fn left_join_on_noc(left: &DataFrame, right: &DataFrame) -> Result<DataFrame> {
    require_column(left, NOC_COLUMN)?;
    require_column(right, NOC_COLUMN)?;

    Ok(left
        .clone()
        .lazy()
        .join(
            right.clone().lazy(),
            [col(NOC_COLUMN)],
            [col(NOC_COLUMN)],
            JoinArgs {
                maintain_order: MaintainOrderJoin::Left,
                ..JoinArgs::new(JoinType::Left)
            },
        )
        .collect()?)
}

fn strip_index_column(df: &DataFrame) -> DataFrame {
    let first = df
        .get_column_names()
        .first()
        .map(|name| name.to_string())
        .unwrap_or_default();

    // Readers name a blank header `column_1`.
    let is_index = first.is_empty()
        || first.starts_with("Unnamed")
        || first == "index"
        || first == "column_1";
    if df.width() > 1 && is_index {
        df.drop(&first).unwrap_or_else(|_| df.clone())
    } else {
        df.clone()
    }
}

/// Rows whose `column` lies in `min..=max`.
pub fn filter_year_range(df: &DataFrame, column: &str, min: i64, max: i64) -> Result<DataFrame> {
    require_column(df, column)?;
    let year = col(column).cast(DataType::Int64);
    df.clone()
        .lazy()
        .filter(year.clone().gt_eq(lit(min)).and(year.lt_eq(lit(max))))
        .collect()
        .context(format!("Filtering {} in {}..={}", column, min, max))
}

/// Smallest and largest value of a numeric column, or None if it has no values.
pub fn year_bounds(df: &DataFrame, column: &str) -> Result<Option<(i64, i64)>> {
    require_column(df, column)?;
    let years = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let years = years.i64()?;
    Ok(years.min().zip(years.max()))
}

/// The `n` rows with the highest value in `by`, highest first.
///
/// Rows with equal counts keep their input order.
pub fn top_n(summary: &DataFrame, by: MedalColumn, n: usize) -> Result<DataFrame> {
    require_column(summary, by.column_name())?;
    let sorted = summary
        .clone()
        .lazy()
        .sort_by_exprs(
            [col(by.column_name())],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()
        .context(format!("Ranking by {}", by))?;
    Ok(sorted.head(Some(n)))
}

/// Sum each medal column of a summary table.
pub fn medal_totals(summary: &DataFrame) -> Result<MedalTotals> {
    let mut sums = [0u64; 4];
    for (slot, column) in sums.iter_mut().zip(MedalColumn::ALL) {
        require_column(summary, column.column_name())?;
        let values = summary
            .column(column.column_name())?
            .as_materialized_series()
            .cast(&DataType::UInt64)?;
        *slot = values.u64()?.sum().unwrap_or(0);
    }

    let [gold, silver, bronze, total] = sums;
    Ok(MedalTotals {
        gold,
        silver,
        bronze,
        total,
    })
}

/// Distinct non-null values of `column` plus `all_label`, sorted together.
pub fn dropdown_options(df: &DataFrame, column: &str, all_label: &str) -> Result<Vec<String>> {
    require_column(df, column)?;
    let series = df.column(column)?.as_materialized_series();
    let mut options: BTreeSet<String> = string_values(series)?.into_iter().collect();
    options.insert(all_label.to_string());
    Ok(options.into_iter().collect())
}

/// Slider marks from `min` (inclusive) to `max` (exclusive) every `step` years.
pub fn decade_marks(min: i64, max: i64, step: usize) -> Vec<i64> {
    (min..max).step_by(step.max(1)).collect()
}
