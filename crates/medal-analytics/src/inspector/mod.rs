//! Load / inspect / clean / export workflow for a single named data file.
//!
//! A [`DataInspector`] moves through explicit states:
//!
//! ```text
//! Constructed --parse--> Parsed --clean--> Cleaned --export--> Exported
//! ```
//!
//! `describe` is available in every state that holds a table and `clean` may
//! be repeated. Each step is also exposed as a pure function
//! ([`read_table`](crate::io::read_table), [`drop_incomplete_rows`],
//! [`describe_table`], [`write_table`](crate::io::write_table)) for callers
//! that do not need the stateful wrapper.

mod statistics;

pub use statistics::describe_table;

use crate::config::InspectorConfig;
use crate::error::{AnalyticsError, Result, ResultExt};
use crate::io::{DEFAULT_SHEET_NAME, ReadOptions, read_table, write_table};
use crate::types::{DatasetReport, FileFormat};
use crate::utils::nan_to_null;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where a dataset is read from and written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// File name including extension, e.g. `athlete_events.csv`.
    pub name: String,
    pub import_dir: PathBuf,
    pub export_dir: PathBuf,
    pub sheet_name: Option<String>,
}

impl DatasetDescriptor {
    /// Describe `name` using the directories and sheet of `config`.
    pub fn new(name: impl Into<String>, config: &InspectorConfig) -> Self {
        Self {
            name: name.into(),
            import_dir: config.import_dir.clone(),
            export_dir: config.export_dir.clone(),
            sheet_name: config.sheet_name.clone(),
        }
    }

    /// Format implied by the file extension.
    pub fn format(&self) -> Result<FileFormat> {
        FileFormat::from_path(&self.name)
    }

    pub fn import_path(&self) -> PathBuf {
        self.import_dir.join(&self.name)
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.name)
    }
}

/// Lifecycle position of a [`DataInspector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectorState {
    Constructed,
    Parsed,
    Cleaned,
    Exported,
}

impl InspectorState {
    pub fn has_table(&self) -> bool {
        !matches!(self, InspectorState::Constructed)
    }
}

/// Stateful wrapper around one data file.
///
/// # Example
///
/// ```rust,ignore
/// use medal_analytics::{DataInspector, InspectorConfig};
///
/// let mut inspector = DataInspector::new("athlete_events.csv", InspectorConfig::default())?;
/// inspector.parse()?;
/// println!("{}", inspector.describe()?);
/// inspector.clean()?;
/// let written = inspector.export()?;
/// ```
#[derive(Debug)]
pub struct DataInspector {
    descriptor: DatasetDescriptor,
    config: InspectorConfig,
    state: InspectorState,
    table: Option<DataFrame>,
}

static_assertions::assert_impl_all!(DataInspector: Send, Sync);

impl DataInspector {
    /// Create an inspector for `name`. Nothing is read yet.
    ///
    /// Construction succeeds for any extension; an unsupported one is
    /// reported by `parse` or `export`.
    pub fn new(name: impl Into<String>, config: InspectorConfig) -> Result<Self> {
        config.validate()?;
        let descriptor = DatasetDescriptor::new(name, &config);
        Ok(Self {
            descriptor,
            config,
            state: InspectorState::Constructed,
            table: None,
        })
    }

    pub fn descriptor(&self) -> &DatasetDescriptor {
        &self.descriptor
    }

    pub fn state(&self) -> InspectorState {
        self.state
    }

    /// The loaded table, if `parse` has succeeded.
    pub fn table(&self) -> Option<&DataFrame> {
        self.table.as_ref()
    }

    /// Consume the inspector, returning the loaded table.
    pub fn into_table(self) -> Option<DataFrame> {
        self.table
    }

    /// Read `import_dir/name` into memory.
    ///
    /// Calling `parse` again re-reads the file and discards any cleaning.
    /// On failure the previous state and table are kept.
    pub fn parse(&mut self) -> Result<&DataFrame> {
        self.descriptor.format()?;
        let path = self.descriptor.import_path();
        let options = ReadOptions {
            sheet_name: self.descriptor.sheet_name.as_deref(),
            infer_schema_length: self.config.infer_schema_length,
        };

        let df = read_table(&path, options)?;

        self.state = InspectorState::Parsed;
        Ok(self.table.insert(df))
    }

    /// Diagnostic report of the current table. Read-only.
    pub fn describe(&self) -> Result<DatasetReport> {
        let df = self.loaded()?;
        describe_table(
            df,
            &self.descriptor.name,
            self.descriptor.sheet_name.as_deref(),
            self.config.top_missing,
            self.config.preview_rows,
        )
    }

    /// Drop every row that has a missing value in any column.
    ///
    /// Returns the number of rows removed. Running it again removes nothing.
    pub fn clean(&mut self) -> Result<usize> {
        let df = self.loaded()?;
        let before = df.height();
        let cleaned = drop_incomplete_rows(df)?;
        let removed = before - cleaned.height();

        if removed > 0 {
            info!(
                "Removed {} of {} rows with missing values from {}",
                removed, before, self.descriptor.name
            );
        }

        self.table = Some(cleaned);
        self.state = InspectorState::Cleaned;
        Ok(removed)
    }

    /// Write the current table to `export_dir/name`.
    ///
    /// The export directory is created if needed. Spreadsheets are written to
    /// the configured sheet, or `Sheet1`.
    pub fn export(&mut self) -> Result<PathBuf> {
        self.descriptor.format()?;
        if self.state == InspectorState::Parsed {
            warn!(
                "Exporting {} before cleaning; missing values are written as-is",
                self.descriptor.name
            );
        }

        let path = self.descriptor.export_path();
        let sheet = self
            .descriptor
            .sheet_name
            .as_deref()
            .unwrap_or(DEFAULT_SHEET_NAME);
        let df = self.table.as_mut().ok_or(AnalyticsError::NoDataLoaded)?;

        write_table(df, &path, Some(sheet))?;
        self.state = InspectorState::Exported;
        Ok(path)
    }

    /// parse, clean and export in one go. Returns the written path.
    pub fn process(&mut self) -> Result<PathBuf> {
        self.parse()?;
        self.clean()?;
        self.export()
    }

    fn loaded(&self) -> Result<&DataFrame> {
        self.table.as_ref().ok_or(AnalyticsError::NoDataLoaded)
    }
}

/// Rows of `df` that have no missing value (null or NaN) in any column.
///
/// Relative row order is kept and the result is positionally indexed from 0.
pub fn drop_incomplete_rows(df: &DataFrame) -> Result<DataFrame> {
    nan_to_null(df)
        .and_then(|df| df.drop_nulls::<String>(None))
        .context("Dropping rows with missing values")
}

/// Convenience for `DataInspector::new(name, config)?.process()`.
pub fn process_file(name: impl Into<String>, config: InspectorConfig) -> Result<PathBuf> {
    DataInspector::new(name, config)?.process()
}

/// Whether `path` names a file this module can read and write.
pub fn is_supported(path: impl AsRef<Path>) -> bool {
    FileFormat::from_path(path).is_ok()
}
