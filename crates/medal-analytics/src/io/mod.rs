//! Table reading and writing.
//!
//! The on-disk format is always selected from the file extension:
//! - `.csv` goes through the polars CSV reader/writer
//! - `.xlsx` goes through the workbook reader/writer in [`spreadsheet`]
//!
//! Any other extension fails with
//! [`AnalyticsError::UnsupportedFormat`](crate::error::AnalyticsError::UnsupportedFormat)
//! before the file system is touched.

mod spreadsheet;

use crate::error::{AnalyticsError, Result, ResultExt};
use crate::types::FileFormat;
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// CSV cell texts read as missing, besides empty fields.
pub const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Sheet name written when no sheet was selected.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Options for [`read_table`].
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions<'a> {
    /// Worksheet to read for spreadsheet files; the first sheet when None.
    pub sheet_name: Option<&'a str>,
    /// Number of CSV rows sampled for schema inference.
    pub infer_schema_length: usize,
}

impl Default for ReadOptions<'_> {
    fn default() -> Self {
        Self {
            sheet_name: None,
            infer_schema_length: 1000,
        }
    }
}

/// Read a table from `path`, choosing the reader from the file extension.
pub fn read_table(path: impl AsRef<Path>, options: ReadOptions<'_>) -> Result<DataFrame> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;

    if !path.exists() {
        return Err(AnalyticsError::FileNotFound(path.to_path_buf()));
    }

    debug!("Reading {} table from {}", format, path.display());

    let df = match format {
        FileFormat::Csv => read_csv(path, options.infer_schema_length)?,
        FileFormat::Xlsx => spreadsheet::read_sheet(path, options.sheet_name)?,
    };

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write `df` to `path`, choosing the writer from the file extension.
///
/// The parent directory is created if needed and an existing file is
/// overwritten. No index column is written.
pub fn write_table(df: &mut DataFrame, path: impl AsRef<Path>, sheet_name: Option<&str>) -> Result<()> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    match format {
        FileFormat::Csv => {
            let mut file = File::create(path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .with_separator(b',')
                .with_quote_char(b'"')
                .finish(df)
                .context(format!("Writing {}", path.display()))?;
        }
        FileFormat::Xlsx => {
            spreadsheet::write_sheet(df, path, sheet_name.unwrap_or(DEFAULT_SHEET_NAME))?;
        }
    }

    info!(
        "Saved {}: {} rows x {} columns",
        path.display(),
        df.height(),
        df.width()
    );
    Ok(())
}

fn read_csv(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(MISSING_TOKENS.iter().map(|t| (*t).into()).collect());
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_schema_length))
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .context(format!("Parsing {}", path.display()))
}
