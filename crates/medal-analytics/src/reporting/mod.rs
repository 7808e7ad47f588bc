//! Report generation for dataset inspections.
//!
//! [`InspectionReport`] wraps a [`DatasetReport`](crate::types::DatasetReport)
//! with run metadata and is used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//!
//! # Example
//!
//! ```rust,ignore
//! use medal_analytics::reporting::{InspectionReport, ReportGenerator};
//!
//! let report = InspectionReport::new("data/athletes.csv", inspector.describe()?);
//! let generator = ReportGenerator::new("reports");
//! generator.write_report_to_file(&report, "athletes")?;
//! ```

mod generator;

pub use generator::{InspectionReport, ReportGenerator};
