use crate::error::Result;
use crate::types::DatasetReport;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A dataset report plus the metadata of the run that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned output file (if written)
    pub output_file: Option<String>,
    /// Rows dropped by cleaning (if cleaning ran)
    pub rows_removed: Option<usize>,
    pub dataset: DatasetReport,
}

impl InspectionReport {
    pub fn new(input_file: impl AsRef<Path>, dataset: DatasetReport) -> Self {
        Self {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.as_ref().display().to_string(),
            output_file: None,
            rows_removed: None,
            dataset,
        }
    }

    /// Record the outcome of a clean-and-export run.
    pub fn with_cleaning(mut self, output_file: impl AsRef<Path>, rows_removed: usize) -> Self {
        self.output_file = Some(output_file.as_ref().display().to_string());
        self.rows_removed = Some(rows_removed);
        self
    }
}

/// Writes inspection reports as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `report` to `{output_dir}/{base_name}_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &InspectionReport,
        base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;
        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
