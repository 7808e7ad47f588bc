use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Column holding the medal outcome of a result record.
pub const MEDAL_COLUMN: &str = "Medal";

/// Column holding the sum of the three medal counts in a summary table.
pub const TOTAL_COLUMN: &str = "Total";

// ============================================================================
// File formats
// ============================================================================

/// On-disk table format, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// Comma-separated text with a header row.
    Csv,
    /// Excel workbook.
    Xlsx,
}

impl FileFormat {
    /// Resolve the format of a file from its extension (case-insensitive).
    ///
    /// Any extension other than `csv` or `xlsx` yields
    /// [`AnalyticsError::UnsupportedFormat`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "" => Err(AnalyticsError::UnsupportedFormat(path.display().to_string())),
            other => Err(AnalyticsError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ============================================================================
// Medals
// ============================================================================

/// A medal outcome recorded in a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MedalKind {
    Gold,
    Silver,
    Bronze,
}

impl MedalKind {
    /// All medal kinds in podium order.
    pub const ALL: [MedalKind; 3] = [MedalKind::Gold, MedalKind::Silver, MedalKind::Bronze];

    /// The value stored in the medal column, which is also the name of the
    /// count column in a summary table.
    pub fn column_name(&self) -> &'static str {
        match self {
            MedalKind::Gold => "Gold",
            MedalKind::Silver => "Silver",
            MedalKind::Bronze => "Bronze",
        }
    }
}

/// One of the four count columns of a grouped medal summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MedalColumn {
    Gold,
    Silver,
    Bronze,
    #[default]
    Total,
}

impl MedalColumn {
    pub const ALL: [MedalColumn; 4] = [
        MedalColumn::Gold,
        MedalColumn::Silver,
        MedalColumn::Bronze,
        MedalColumn::Total,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            MedalColumn::Gold => MedalKind::Gold.column_name(),
            MedalColumn::Silver => MedalKind::Silver.column_name(),
            MedalColumn::Bronze => MedalKind::Bronze.column_name(),
            MedalColumn::Total => TOTAL_COLUMN,
        }
    }
}

impl FromStr for MedalColumn {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        MedalColumn::ALL
            .into_iter()
            .find(|column| column.column_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AnalyticsError::ColumnNotFound(s.to_string()))
    }
}

impl fmt::Display for MedalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Column sums over a medal summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MedalTotals {
    pub gold: u64,
    pub silver: u64,
    pub bronze: u64,
    pub total: u64,
}

impl MedalTotals {
    pub fn get(&self, column: MedalColumn) -> u64 {
        match column {
            MedalColumn::Gold => self.gold,
            MedalColumn::Silver => self.silver,
            MedalColumn::Bronze => self.bronze,
            MedalColumn::Total => self.total,
        }
    }
}

// ============================================================================
// Dataset report types
// ============================================================================

/// Missing-value diagnostics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_count: usize,
    /// `missing_count / row_count`, or 0.0 for an empty table.
    pub missing_fraction: f64,
}

/// Descriptive statistics for one numeric column, computed over non-null values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Name and data type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub column: String,
    pub dtype: String,
}

/// Diagnostic report over a loaded table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    pub row_count: usize,
    pub column_count: usize,
    pub column_types: Vec<ColumnType>,
    /// First rows of the table, rendered as text.
    pub preview: String,
    pub numeric_summaries: Vec<NumericSummary>,
    /// Missing-value diagnostics in column order.
    pub missing: Vec<ColumnMissing>,
    pub total_missing: usize,
    /// Columns with the highest missing fraction, descending.
    pub most_missing: Vec<ColumnMissing>,
}

impl DatasetReport {
    /// Look up the missing-value diagnostics of a column.
    pub fn missing_for(&self, column: &str) -> Option<&ColumnMissing> {
        self.missing.iter().find(|m| m.column == column)
    }

    /// Look up the numeric summary of a column.
    pub fn summary_for(&self, column: &str) -> Option<&NumericSummary> {
        self.numeric_summaries.iter().find(|s| s.column == column)
    }
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(
            f,
            "Sheet name: {}",
            self.sheet_name.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "Shape: ({}, {})", self.row_count, self.column_count)?;
        writeln!(f)?;

        writeln!(f, "Data head():")?;
        writeln!(f, "{}", self.preview)?;
        writeln!(f)?;

        writeln!(f, "Variable types:")?;
        for column in &self.column_types {
            writeln!(f, "  {:<20} {}", column.column, column.dtype)?;
        }
        writeln!(f)?;

        if !self.numeric_summaries.is_empty() {
            writeln!(f, "Numeric description:")?;
            writeln!(
                f,
                "  {:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
            )?;
            for s in &self.numeric_summaries {
                writeln!(
                    f,
                    "  {:<20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                    s.column,
                    s.count,
                    fmt_stat(s.mean),
                    fmt_stat(s.std),
                    fmt_stat(s.min),
                    fmt_stat(s.q25),
                    fmt_stat(s.median),
                    fmt_stat(s.q75),
                    fmt_stat(s.max),
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Missing values per column:")?;
        for m in &self.missing {
            writeln!(
                f,
                "  {:<20} {:>8} {:>8.1}%",
                m.column,
                m.missing_count,
                m.missing_fraction * 100.0
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total number of missing values: {}", self.total_missing)?;
        writeln!(f)?;

        writeln!(f, "Variables with the most missing values:")?;
        for m in &self.most_missing {
            writeln!(f, "  {:<20} {:.4}", m.column, m.missing_fraction)?;
        }

        Ok(())
    }
}
