//! Integration tests for medal aggregation, dashboard views and inspection.
//!
//! These tests use the sample files in tests/fixtures.

use medal_analytics::queries::{ALL_REGIONS, ALL_SPORTS, filter_year_range, medal_totals, top_n};
use medal_analytics::{
    AnalyticsError, DashboardConfig, DashboardData, DataInspector, InspectionReport,
    InspectorConfig, InspectorState, MedalColumn, ReadOptions, ReportGenerator, count_medals,
    count_medals_n, describe_table, drop_incomplete_rows, read_table, write_table,
};
use medal_analytics::queries::Selection;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> DataFrame {
    read_table(fixtures_path().join(filename), ReadOptions::default())
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

fn column_strings(df: &DataFrame, column: &str) -> Vec<Option<String>> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

fn column_u32(df: &DataFrame, column: &str) -> Vec<u32> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .u32()
        .unwrap()
        .into_no_null_iter()
        .collect()
}

/// Copy a fixture into `<dir>/data/` and return a config rooted at `dir`.
fn staged_config(dir: &Path, fixture: &str) -> InspectorConfig {
    let data = dir.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::copy(fixtures_path().join(fixture), data.join(fixture)).unwrap();

    InspectorConfig::builder()
        .import_dir(data)
        .export_dir(dir.join("data_clean"))
        .build()
        .unwrap()
}

fn dashboard() -> DashboardData {
    let config = DashboardConfig::builder()
        .athletes_path(fixtures_path().join("canada_subset.csv"))
        .athlete_regions_path(fixtures_path().join("athlete_regions.csv"))
        .noc_iso_path(fixtures_path().join("noc_iso.csv"))
        .build()
        .unwrap();
    DashboardData::load(&config).unwrap()
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_medals_by_year_from_fixture() {
    let df = load_fixture("canada_subset.csv");
    let by_year = count_medals(&df, &["Year"]).unwrap();

    assert_eq!(by_year.height(), 5);
    assert_eq!(column_u32(&by_year, "Gold"), vec![1, 2, 0, 2, 1]);
    assert_eq!(column_u32(&by_year, "Silver"), vec![1, 0, 0, 0, 0]);
    assert_eq!(column_u32(&by_year, "Bronze"), vec![0, 0, 1, 0, 0]);
    assert_eq!(column_u32(&by_year, "Total"), vec![2, 2, 1, 2, 1]);
}

#[test]
fn test_one_row_per_distinct_key() {
    let df = load_fixture("canada_subset.csv");
    let by_sport = count_medals_n(&df, "Sport", &[]).unwrap();

    let distinct = df.column("Sport").unwrap().n_unique().unwrap();
    assert_eq!(by_sport.height(), distinct);

    let totals = medal_totals(&by_sport).unwrap();
    assert_eq!(totals.gold + totals.silver + totals.bronze, totals.total);
    assert_eq!(totals.total, 8);
}

#[test]
fn test_invalid_grouping_key_on_fixture() {
    let df = load_fixture("canada_subset.csv");
    let err = count_medals(&df, &["NotAColumn"]).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidGroupingKey(_)));
}

#[test]
fn test_top_sports_by_medal() {
    let df = load_fixture("canada_subset.csv");
    let by_sport = count_medals_n(&df, "Sport", &[]).unwrap();

    let top_total = top_n(&by_sport, MedalColumn::Total, 2).unwrap();
    assert_eq!(
        column_strings(&top_total, "Sport"),
        vec![Some("Ice Hockey".to_string()), Some("Rowing".to_string())]
    );

    let top_gold = top_n(&by_sport, MedalColumn::Gold, 4).unwrap();
    assert_eq!(column_u32(&top_gold, "Gold"), vec![3, 2, 1, 0]);
}

#[test]
fn test_year_window_totals() {
    let df = load_fixture("canada_subset.csv");
    let by_year = count_medals(&df, &["Year"]).unwrap();
    let window = filter_year_range(&by_year, "Year", 2002, 2006).unwrap();

    assert_eq!(window.height(), 3);
    assert_eq!(medal_totals(&window).unwrap().total, 5);
}

// ============================================================================
// Dashboard Views
// ============================================================================

#[test]
fn test_dashboard_world_medals() {
    let data = dashboard();
    let world = data.world_medals(&Selection::All).unwrap();

    assert_eq!(world.height(), 6);
    assert_eq!(
        column_strings(&world, "NOC"),
        ["CAN", "NOR", "CAN", "NOR", "ROT", "USA"]
            .iter()
            .map(|s| Some(s.to_string()))
            .collect::<Vec<_>>()
    );
    assert_eq!(world.column("Country").unwrap().null_count(), 1);
    assert!(!world.get_column_names().iter().any(|n| n.as_str() == "column_1"));

    let rowing = data
        .world_medals(&Selection::from_widget("Rowing", ALL_SPORTS))
        .unwrap();
    assert_eq!(rowing.height(), 3);
}

#[test]
fn test_dashboard_region_views() {
    let data = dashboard();

    assert_eq!(
        data.region_options().unwrap(),
        vec!["All regions", "Canada", "Norway", "USA"]
    );
    assert_eq!(data.sport_options().unwrap()[0], ALL_SPORTS);

    let all = Selection::from_widget(ALL_REGIONS, ALL_REGIONS);
    let top = data.region_top_attribute(&all, "Sport", 10).unwrap();
    assert_eq!(column_strings(&top, "Sport")[0].as_deref(), Some("Rowing"));
    assert_eq!(column_u32(&top, "Total")[0], 3);

    let norway = data
        .region_top_attribute(&Selection::Only("Norway".into()), "Sport", 10)
        .unwrap();
    assert_eq!(norway.height(), 2);
}

#[test]
fn test_dashboard_featured_country() {
    let data = dashboard();
    assert_eq!(data.medals_by_year().unwrap().height(), 5);
    assert_eq!(data.medals_by_year_and_season().unwrap().height(), 5);
    assert_eq!(data.year_range().unwrap(), Some((2000, 2016)));
}

#[test]
fn test_dashboard_missing_file() {
    let config = DashboardConfig::builder()
        .athletes_path(fixtures_path().join("absent.csv"))
        .build()
        .unwrap();
    let err = DashboardData::load(&config).unwrap_err();
    assert_eq!(err.error_code(), "FILE_NOT_FOUND");
}

// ============================================================================
// Inspector Workflow
// ============================================================================

#[test]
fn test_missing_age_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = staged_config(dir.path(), "athletes_missing_age.csv");

    let mut inspector = DataInspector::new("athletes_missing_age.csv", config).unwrap();
    inspector.parse().unwrap();

    let report = inspector.describe().unwrap();
    let age = report.missing_for("Age").unwrap();
    assert_eq!(age.missing_count, 3);
    assert!((age.missing_fraction - 0.3).abs() < 1e-12);
    assert_eq!(report.most_missing[0].column, "Age");

    assert_eq!(inspector.clean().unwrap(), 3);
    let indexed = inspector
        .table()
        .unwrap()
        .with_row_index("index".into(), None)
        .unwrap();
    assert_eq!(indexed.height(), 7);
    let last = indexed.column("index").unwrap().get(6).unwrap();
    assert_eq!(last.extract::<u64>(), Some(6));
}

#[test]
fn test_na_tokens_are_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = staged_config(dir.path(), "athletes_na_tokens.csv");

    let mut inspector = DataInspector::new("athletes_na_tokens.csv", config).unwrap();
    inspector.parse().unwrap();

    let table = inspector.table().unwrap();
    assert_eq!(table.column("Age").unwrap().dtype(), &DataType::Int64);
    assert_eq!(table.column("Height").unwrap().dtype(), &DataType::Float64);
    assert_eq!(table.column("Weight").unwrap().dtype(), &DataType::Float64);

    let report = inspector.describe().unwrap();
    let fraction = |column: &str| report.missing_for(column).unwrap().missing_fraction;
    assert!((fraction("Age") - 0.125).abs() < 1e-12);
    assert!((fraction("Height") - 0.25).abs() < 1e-12);
    assert!((fraction("Weight") - 0.375).abs() < 1e-12);
    assert!((fraction("Medal") - 0.25).abs() < 1e-12);
    assert_eq!(report.total_missing, 7);
    assert_eq!(report.most_missing[0].column, "Weight");

    let height = report.summary_for("Height").unwrap();
    assert_eq!(height.count, 6);
    assert_eq!(height.min, Some(168.0));
    assert_eq!(height.max, Some(188.0));

    assert_eq!(inspector.clean().unwrap(), 6);
    let cleaned = inspector.table().unwrap();
    assert_eq!(cleaned.height(), 2);
    assert_eq!(
        column_strings(cleaned, "Name"),
        vec![
            Some("Christine Jacoba Aaftink".to_string()),
            Some("Per Knut Aaland".to_string()),
        ]
    );
}

#[test]
fn test_nan_rows_dropped_by_pure_clean() {
    let df = df!(
        "Name" => &["A", "B", "C"],
        "Height" => &[180.0f64, f64::NAN, 175.5]
    )
    .unwrap();

    let report = describe_table(&df, "heights.csv", None, 5, 5).unwrap();
    assert_eq!(report.missing_for("Height").unwrap().missing_count, 1);
    assert_eq!(report.summary_for("Height").unwrap().max, Some(180.0));

    let cleaned = drop_incomplete_rows(&df).unwrap();
    assert_eq!(cleaned.height(), 2);
}

#[test]
fn test_process_csv_reimport_matches() {
    let dir = tempfile::tempdir().unwrap();
    let config = staged_config(dir.path(), "canada_subset.csv");

    let mut inspector = DataInspector::new("canada_subset.csv", config).unwrap();
    let written = inspector.process().unwrap();
    assert_eq!(inspector.state(), InspectorState::Exported);
    assert!(written.starts_with(dir.path().join("data_clean")));

    let back = read_table(&written, ReadOptions::default()).unwrap();
    assert_eq!(back.height(), 8);
    assert!(back.equals(inspector.table().unwrap()));
}

#[test]
fn test_stateful_and_pure_forms_agree() {
    let dir = tempfile::tempdir().unwrap();
    let config = staged_config(dir.path(), "canada_subset.csv");

    let mut inspector = DataInspector::new("canada_subset.csv", config.clone()).unwrap();
    inspector.parse().unwrap();
    let stateful_report = inspector.describe().unwrap();
    inspector.clean().unwrap();

    let raw = read_table(config.import_dir.join("canada_subset.csv"), ReadOptions::default())
        .unwrap();
    let pure_report = describe_table(&raw, "canada_subset.csv", None, 5, 5).unwrap();
    let pure_clean = drop_incomplete_rows(&raw).unwrap();

    assert_eq!(stateful_report.missing, pure_report.missing);
    assert_eq!(stateful_report.total_missing, 3);
    assert!(pure_clean.equals(inspector.table().unwrap()));
}

#[test]
fn test_xlsx_roundtrip_preserves_shape_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canada.xlsx");
    let mut cleaned = drop_incomplete_rows(&load_fixture("canada_subset.csv")).unwrap();

    write_table(&mut cleaned, &path, Some("Results")).unwrap();
    let options = ReadOptions {
        sheet_name: Some("Results"),
        ..ReadOptions::default()
    };
    let back = read_table(&path, options).unwrap();

    assert_eq!(back.shape(), cleaned.shape());
    assert!(back.equals(&cleaned));
}

#[test]
fn test_process_xlsx_with_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let mut source = load_fixture("athletes_missing_age.csv");
    write_table(&mut source, data.join("athletes.xlsx"), Some("Canada")).unwrap();

    let config = InspectorConfig::builder()
        .import_dir(&data)
        .export_dir(dir.path().join("data_clean"))
        .sheet_name("Canada")
        .build()
        .unwrap();

    let mut inspector = DataInspector::new("athletes.xlsx", config).unwrap();
    let written = inspector.process().unwrap();

    let options = ReadOptions {
        sheet_name: Some("Canada"),
        ..ReadOptions::default()
    };
    let back = read_table(&written, options).unwrap();
    assert_eq!(back.height(), 7);
    assert_eq!(back.column("Age").unwrap().null_count(), 0);
}

#[test]
fn test_unsupported_extension_keeps_state() {
    let mut inspector = DataInspector::new("data.json", InspectorConfig::default()).unwrap();
    let err = inspector.parse().unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    assert_eq!(inspector.state(), InspectorState::Constructed);
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_emit_report_after_clean() {
    let dir = tempfile::tempdir().unwrap();
    let config = staged_config(dir.path(), "canada_subset.csv");

    let mut inspector = DataInspector::new("canada_subset.csv", config).unwrap();
    inspector.parse().unwrap();
    let removed = inspector.clean().unwrap();
    let written = inspector.export().unwrap();

    let report = InspectionReport::new(inspector.descriptor().import_path(), inspector.describe().unwrap())
        .with_cleaning(&written, removed);
    let generator = ReportGenerator::new(dir.path().join("reports"));
    let path = generator
        .write_report_to_file(&report, "canada_subset")
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(json["rows_removed"], 2);
    assert_eq!(json["dataset"]["row_count"], 8);
    assert_eq!(json["dataset"]["total_missing"], 0);
}
