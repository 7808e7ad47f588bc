//! Olympic Medal Analytics Library
//!
//! Medal aggregation, dashboard queries and dataset inspection built on Polars.
//!
//! # Overview
//!
//! - **Aggregation**: Gold/Silver/Bronze/Total counts per distinct combination
//!   of grouping columns ([`count_medals`], [`count_medals_n`])
//! - **Queries**: sport/region/sex filters, NOC lookups, year windows and
//!   top-N rankings used by the dashboard ([`queries`], [`DashboardData`])
//! - **Inspection**: load a CSV/XLSX file, describe it, drop incomplete rows
//!   and export the result ([`DataInspector`])
//! - **Reporting**: JSON reports of an inspection ([`ReportGenerator`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use medal_analytics::{count_medals, read_table, ReadOptions};
//!
//! let athletes = read_table("data/canada.csv", ReadOptions::default())?;
//! let by_year = count_medals(&athletes, &["Year"])?;
//! println!("{}", by_year);
//! ```
//!
//! # Cleaning a file
//!
//! ```rust,ignore
//! use medal_analytics::{DataInspector, InspectorConfig};
//!
//! let config = InspectorConfig::builder()
//!     .import_dir("data/")
//!     .export_dir("data_clean/")
//!     .build()?;
//!
//! let mut inspector = DataInspector::new("athlete_events.csv", config)?;
//! inspector.parse()?;
//! println!("{}", inspector.describe()?);
//! let removed = inspector.clean()?;
//! let written = inspector.export()?;
//! ```

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod inspector;
pub mod io;
pub mod queries;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use aggregator::{count_medals, count_medals_n};
pub use config::{
    ConfigValidationError, DashboardConfig, DashboardConfigBuilder, InspectorConfig,
    InspectorConfigBuilder,
};
pub use dashboard::DashboardData;
pub use error::{AnalyticsError, Result as AnalyticsResult, ResultExt};
pub use inspector::{
    DataInspector, DatasetDescriptor, InspectorState, describe_table, drop_incomplete_rows,
    process_file,
};
pub use io::{ReadOptions, read_table, write_table};
pub use reporting::{InspectionReport, ReportGenerator};
pub use types::{
    ColumnMissing, ColumnType, DatasetReport, FileFormat, MEDAL_COLUMN, MedalColumn, MedalKind,
    MedalTotals, NumericSummary, TOTAL_COLUMN,
};
