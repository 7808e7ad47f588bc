//! Configuration types for dataset inspection and dashboard data loading.
//!
//! Both configurations use the builder pattern and are validated on `build()`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for [`DataInspector`](crate::inspector::DataInspector) and the
/// table readers in [`io`](crate::io).
///
/// # Example
///
/// ```rust,ignore
/// use medal_analytics::config::InspectorConfig;
///
/// let config = InspectorConfig::builder()
///     .import_dir("raw/")
///     .export_dir("clean/")
///     .top_missing(3)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// Directory the source file is read from.
    /// Default: "data/"
    pub import_dir: PathBuf,

    /// Directory the cleaned file is written to.
    /// Default: "data_clean/"
    pub export_dir: PathBuf,

    /// Worksheet to read from (and tag on export) for spreadsheet files.
    /// If None, the first sheet is read and "Sheet1" is written.
    /// Default: None
    pub sheet_name: Option<String>,

    /// Number of CSV rows sampled for schema inference.
    /// Default: 1000
    pub infer_schema_length: usize,

    /// Number of columns listed in the "most missing" ranking of a report.
    /// Default: 5
    pub top_missing: usize,

    /// Number of rows rendered in the report preview.
    /// Default: 5
    pub preview_rows: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            import_dir: PathBuf::from("data/"),
            export_dir: PathBuf::from("data_clean/"),
            sheet_name: None,
            infer_schema_length: 1000,
            top_missing: 5,
            preview_rows: 5,
        }
    }
}

impl InspectorConfig {
    /// Create a new configuration builder.
    pub fn builder() -> InspectorConfigBuilder {
        InspectorConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.infer_schema_length == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "infer_schema_length".to_string(),
            });
        }

        if self.top_missing == 0 {
            return Err(ConfigValidationError::MustBePositive {
                field: "top_missing".to_string(),
            });
        }

        if let Some(sheet) = &self.sheet_name
            && sheet.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyValue {
                field: "sheet_name".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': must be at least 1")]
    MustBePositive { field: String },

    #[error("Invalid value for '{field}': must not be empty")]
    EmptyValue { field: String },
}

/// Builder for [`InspectorConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct InspectorConfigBuilder {
    import_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    sheet_name: Option<String>,
    infer_schema_length: Option<usize>,
    top_missing: Option<usize>,
    preview_rows: Option<usize>,
}

impl InspectorConfigBuilder {
    /// Set the directory the source file is read from.
    pub fn import_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_dir = Some(path.into());
        self
    }

    /// Set the directory the cleaned file is written to.
    pub fn export_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(path.into());
        self
    }

    /// Select a worksheet for spreadsheet files.
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Set the number of CSV rows sampled for schema inference.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set how many columns appear in the "most missing" ranking.
    pub fn top_missing(mut self, count: usize) -> Self {
        self.top_missing = Some(count);
        self
    }

    /// Set how many rows the report preview renders.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `InspectorConfig` or an error if validation fails.
    pub fn build(self) -> Result<InspectorConfig, ConfigValidationError> {
        let defaults = InspectorConfig::default();
        let config = InspectorConfig {
            import_dir: self.import_dir.unwrap_or(defaults.import_dir),
            export_dir: self.export_dir.unwrap_or(defaults.export_dir),
            sheet_name: self.sheet_name,
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            top_missing: self.top_missing.unwrap_or(defaults.top_missing),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Locations of the tables a dashboard loads once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Per-athlete results for the featured country.
    /// Default: "data/canada.csv"
    pub athletes_path: PathBuf,

    /// Per-athlete results joined with the NOC region lookup.
    /// Default: "data/athlete_regions.csv"
    pub athlete_regions_path: PathBuf,

    /// NOC to ISO code / country name lookup.
    /// Default: "data/noc_iso.csv"
    pub noc_iso_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            athletes_path: PathBuf::from("data/canada.csv"),
            athlete_regions_path: PathBuf::from("data/athlete_regions.csv"),
            noc_iso_path: PathBuf::from("data/noc_iso.csv"),
        }
    }
}

impl DashboardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, path) in [
            ("athletes_path", &self.athletes_path),
            ("athlete_regions_path", &self.athlete_regions_path),
            ("noc_iso_path", &self.noc_iso_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyValue {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`DashboardConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct DashboardConfigBuilder {
    athletes_path: Option<PathBuf>,
    athlete_regions_path: Option<PathBuf>,
    noc_iso_path: Option<PathBuf>,
}

impl DashboardConfigBuilder {
    pub fn athletes_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.athletes_path = Some(path.into());
        self
    }

    pub fn athlete_regions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.athlete_regions_path = Some(path.into());
        self
    }

    pub fn noc_iso_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.noc_iso_path = Some(path.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<DashboardConfig, ConfigValidationError> {
        let defaults = DashboardConfig::default();
        let config = DashboardConfig {
            athletes_path: self.athletes_path.unwrap_or(defaults.athletes_path),
            athlete_regions_path: self
                .athlete_regions_path
                .unwrap_or(defaults.athlete_regions_path),
            noc_iso_path: self.noc_iso_path.unwrap_or(defaults.noc_iso_path),
        };

        config.validate()?;
        Ok(config)
    }
}
