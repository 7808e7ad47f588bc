//! CLI entry point for medal aggregation and dataset inspection.

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use medal_analytics::queries::{
    ALL_REGIONS, ALL_SPORTS, REGION_COLUMN, Selection, apply_selection, filter_year_range,
    medal_totals, top_n,
};
use medal_analytics::utils::{DtypeCategory, get_dtype_category};
use medal_analytics::{
    DataInspector, InspectionReport, InspectorConfig, MedalColumn, ReadOptions, ReportGenerator,
    count_medals, count_medals_n, read_table,
};
use polars::prelude::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Olympic medal aggregation and dataset inspection",
    long_about = "Count Gold/Silver/Bronze medals over result-record tables and inspect, \
                  clean and export CSV/XLSX data files.\n\n\
                  EXAMPLES:\n  \
                  # Describe data/athlete_events.csv\n  \
                  medal-analytics inspect athlete_events.csv\n\n  \
                  # Drop incomplete rows and write data_clean/athlete_events.csv\n  \
                  medal-analytics clean athlete_events.csv\n\n  \
                  # Medals per NOC and year for rowing\n  \
                  medal-analytics count data/athlete_regions.csv --by NOC --by Year --sport Rowing\n\n  \
                  # Ten sports with the most gold medals\n  \
                  medal-analytics top data/canada.csv --by Sport --medal gold"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and results)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs so stdout holds only the JSON document.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe a data file: shape, types, preview, statistics and missing values
    Inspect {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Write a JSON report to this directory as <file_stem>_report.json
        #[arg(short = 'r', long)]
        emit_report: Option<PathBuf>,
    },
    /// Drop rows with missing values and write the result to the export directory
    Clean {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Directory the cleaned file is written to
        #[arg(short, long, default_value = "data_clean/")]
        export_dir: PathBuf,

        /// Write a JSON report to this directory as <file_stem>_report.json
        #[arg(short = 'r', long)]
        emit_report: Option<PathBuf>,
    },
    /// Count medals grouped by one or more columns
    Count {
        #[command(flatten)]
        records: RecordArgs,

        /// Grouping column; repeat for several (the first one leads the output)
        #[arg(long = "by", required = true)]
        by: Vec<String>,
    },
    /// Rank the values of a column by medal count
    Top {
        #[command(flatten)]
        records: RecordArgs,

        /// Column whose values are ranked (Sport, Event, NOC, ...)
        #[arg(long)]
        by: String,

        /// Medal column to rank by (gold, silver, bronze, total)
        #[arg(long, default_value = "Total")]
        medal: MedalColumn,

        /// Number of rows to keep
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// File name (with extension) inside the import directory
    file: String,

    /// Directory the file is read from
    #[arg(short, long, default_value = "data/")]
    import_dir: PathBuf,

    /// Worksheet to read for .xlsx files (default: first sheet)
    #[arg(short, long)]
    sheet: Option<String>,
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Path to a result-record table (.csv or .xlsx)
    path: PathBuf,

    /// Worksheet to read for .xlsx files (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Only count records of this sport ("All Sports" for every sport)
    #[arg(long)]
    sport: Option<String>,

    /// Only count records of this region ("All regions" for every region)
    #[arg(long)]
    region: Option<String>,

    /// First year to include
    #[arg(long)]
    year_from: Option<i64>,

    /// Last year to include
    #[arg(long)]
    year_to: Option<i64>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet, cli.json);

    // Load environment variables from .env file
    dotenv().ok();

    match &cli.command {
        Command::Inspect {
            dataset,
            emit_report,
        } => run_inspect(dataset, emit_report.as_deref(), cli.json),
        Command::Clean {
            dataset,
            export_dir,
            emit_report,
        } => run_clean(dataset, export_dir, emit_report.as_deref(), cli.json),
        Command::Count { records, by } => run_count(records, by, cli.json),
        Command::Top {
            records,
            by,
            medal,
            count,
        } => run_top(records, by, *medal, *count, cli.json),
    }
}

fn inspector_for(dataset: &DatasetArgs, export_dir: Option<&Path>) -> Result<DataInspector> {
    let mut builder = InspectorConfig::builder().import_dir(&dataset.import_dir);
    if let Some(dir) = export_dir {
        builder = builder.export_dir(dir);
    }
    if let Some(ref sheet) = dataset.sheet {
        builder = builder.sheet_name(sheet);
    }
    Ok(DataInspector::new(&dataset.file, builder.build()?)?)
}

fn run_inspect(dataset: &DatasetArgs, emit_report: Option<&Path>, json: bool) -> Result<()> {
    let mut inspector = inspector_for(dataset, None)?;
    inspector.parse()?;

    let report = InspectionReport::new(inspector.descriptor().import_path(), inspector.describe()?);
    emit(&report, emit_report, &dataset.file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.dataset);
    }
    Ok(())
}

fn run_clean(
    dataset: &DatasetArgs,
    export_dir: &Path,
    emit_report: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut inspector = inspector_for(dataset, Some(export_dir))?;
    inspector.parse()?;
    let removed = inspector.clean()?;
    let written = inspector.export()?;

    let report = InspectionReport::new(inspector.descriptor().import_path(), inspector.describe()?)
        .with_cleaning(&written, removed);
    emit(&report, emit_report, &dataset.file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Removed {} rows with missing values; wrote {} rows to {}",
            removed,
            report.dataset.row_count,
            written.display()
        );
    }
    Ok(())
}

fn emit(report: &InspectionReport, dir: Option<&Path>, file: &str) -> Result<()> {
    if let Some(dir) = dir {
        let generator = ReportGenerator::new(dir);
        let report_path = generator.write_report_to_file(report, &extract_file_stem(file))?;
        info!("Report written to: {}", report_path.display());
    }
    Ok(())
}

fn run_count(records: &RecordArgs, by: &[String], json: bool) -> Result<()> {
    let df = load_records(records)?;
    let keys: Vec<&str> = by.iter().map(String::as_str).collect();
    let summary = count_medals(&df, &keys)?;
    let totals = medal_totals(&summary)?;

    if json {
        let mut out = Map::new();
        out.insert("rows".to_string(), frame_to_json(&summary)?);
        out.insert("totals".to_string(), serde_json::to_value(totals)?);
        println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);
    } else {
        println!("{}", summary);
        println!(
            "Gold: {}  Silver: {}  Bronze: {}  Total: {}",
            totals.gold, totals.silver, totals.bronze, totals.total
        );
    }
    Ok(())
}

fn run_top(
    records: &RecordArgs,
    by: &str,
    medal: MedalColumn,
    count: usize,
    json: bool,
) -> Result<()> {
    let df = load_records(records)?;
    let summary = count_medals_n(&df, by, &[])?;
    let top = top_n(&summary, medal, count)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&frame_to_json(&top)?)?);
    } else {
        println!("Top {} {} by {} medals", count, by, medal);
        println!("{}", top);
    }
    Ok(())
}

/// Read a result-record table and apply the sport/region/year filters.
fn load_records(records: &RecordArgs) -> Result<DataFrame> {
    let options = ReadOptions {
        sheet_name: records.sheet.as_deref(),
        ..ReadOptions::default()
    };
    let mut df = read_table(&records.path, options)?;

    if let Some(ref sport) = records.sport {
        df = apply_selection(&df, "Sport", &Selection::from_widget(sport, ALL_SPORTS))?;
    }
    if let Some(ref region) = records.region {
        df = apply_selection(&df, REGION_COLUMN, &Selection::from_widget(region, ALL_REGIONS))?;
    }

    match (records.year_from, records.year_to) {
        (None, None) => {}
        (from, to) => {
            let from = from.unwrap_or(i64::MIN);
            let to = to.unwrap_or(i64::MAX);
            if from > to {
                return Err(anyhow!("--year-from {} is after --year-to {}", from, to));
            }
            df = filter_year_range(&df, "Year", from, to)?;
        }
    }

    if df.height() == 0 {
        warn!("No records left after filtering {}", records.path.display());
    }
    Ok(df)
}

/// Render a table as a JSON array of row objects.
fn frame_to_json(df: &DataFrame) -> Result<Value> {
    let mut rows: Vec<Map<String, Value>> = vec![Map::new(); df.height()];

    for column in df.get_columns() {
        let name = column.name().to_string();
        let series = column.as_materialized_series();
        let values: Vec<Value> = match get_dtype_category(series.dtype()) {
            DtypeCategory::Numeric if series.dtype().is_float() => series
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .map(|v| v.map(Value::from).unwrap_or(Value::Null))
                .collect(),
            DtypeCategory::Numeric => series
                .cast(&DataType::Int64)?
                .i64()?
                .into_iter()
                .map(|v| v.map(Value::from).unwrap_or(Value::Null))
                .collect(),
            DtypeCategory::Boolean => series
                .bool()?
                .into_iter()
                .map(|v| v.map(Value::from).unwrap_or(Value::Null))
                .collect(),
            _ => series
                .cast(&DataType::String)?
                .str()?
                .into_iter()
                .map(|v| v.map(Value::from).unwrap_or(Value::Null))
                .collect(),
        };

        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(name.clone(), value);
        }
    }

    Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
