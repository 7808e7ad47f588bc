//! Excel workbook reading (calamine) and writing (rust_xlsxwriter).
//!
//! The first row of a sheet holds the column names. Column types are inferred
//! from the non-empty cells below it:
//! - every cell a whole number → `Int64`
//! - every cell numeric → `Float64`
//! - every cell boolean → `Boolean`
//! - anything else → `String`
//!
//! Empty cells, blank or missing-token strings (`NA`, `NaN`, ...), NaN and
//! cell errors become nulls.

use super::MISSING_TOKENS;
use crate::error::{AnalyticsError, Result};
use crate::utils::{DtypeCategory, get_dtype_category};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};
use polars::prelude::*;
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::debug;

/// Read one worksheet of an `.xlsx` file into a DataFrame.
pub(crate) fn read_sheet(path: &Path, sheet_name: Option<&str>) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names();

    let sheet = match sheet_name {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => return Err(AnalyticsError::SheetNotFound(name.to_string())),
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| AnalyticsError::SheetNotFound("<first sheet>".to_string()))?,
    };

    debug!("Reading sheet '{}' from {}", sheet, path.display());
    let range = workbook.worksheet_range(&sheet)?;
    range_to_dataframe(&range)
}

fn range_to_dataframe(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            Data::Empty => format!("column_{}", idx + 1),
            other => other.to_string(),
        })
        .collect();
    let body: Vec<&[Data]> = rows.collect();

    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&Data>> = body
                .iter()
                .map(|row| row.get(idx).filter(|cell| !is_missing(cell)))
                .collect();
            cells_to_column(name, &cells)
        })
        .collect::<Vec<Column>>();

    Ok(DataFrame::new(columns)?)
}

fn is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => {
            let s = s.trim();
            s.is_empty() || MISSING_TOKENS.contains(&s)
        }
        Data::Float(v) => v.is_nan(),
        _ => false,
    }
}

fn cells_to_column(name: &str, cells: &[Option<&Data>]) -> Column {
    let present = || cells.iter().flatten();

    let all_numeric = present().all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)));
    let all_bool = present().all(|cell| matches!(cell, Data::Bool(_)));
    let any_present = present().next().is_some();

    if any_present && all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|cell| match cell {
                Some(Data::Int(v)) => Some(*v as f64),
                Some(Data::Float(v)) => Some(*v),
                _ => None,
            })
            .collect();

        let integral = values.iter().flatten().all(|v| fits_i64(*v));
        if integral {
            let ints: Vec<Option<i64>> = values.iter().map(|v| v.map(|v| v as i64)).collect();
            return Column::new(name.into(), ints);
        }
        return Column::new(name.into(), values);
    }

    if any_present && all_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Some(Data::Bool(v)) => Some(*v),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|cell| cell.map(|c| c.to_string()))
        .collect();
    Column::new(name.into(), values)
}

/// Whole number within the `i64` range; `i64::MAX as f64` is 2^63 itself.
fn fits_i64(v: f64) -> bool {
    v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
}

/// Write `df` to a new `.xlsx` file with a single sheet named `sheet_name`.
pub(crate) fn write_sheet(df: &DataFrame, path: &Path, sheet_name: &str) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (idx, column) in df.get_columns().iter().enumerate() {
        let col = ColNum::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)?;
        worksheet.write_string(0, col, column.name().as_str())?;
        write_series(worksheet, col, column.as_materialized_series())?;
    }

    workbook.save(path)?;
    debug!("Wrote sheet '{}' to {}", sheet_name, path.display());
    Ok(())
}

fn data_row(idx: usize) -> std::result::Result<RowNum, XlsxError> {
    RowNum::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)
}

fn write_series(worksheet: &mut Worksheet, col: ColNum, series: &Series) -> Result<()> {
    match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            for (idx, value) in floats.f64()?.into_iter().enumerate() {
                if let Some(v) = value {
                    worksheet.write_number(data_row(idx)?, col, v)?;
                }
            }
        }
        DtypeCategory::Boolean => {
            for (idx, value) in series.bool()?.into_iter().enumerate() {
                if let Some(v) = value {
                    worksheet.write_boolean(data_row(idx)?, col, v)?;
                }
            }
        }
        _ => {
            let strings = series.cast(&DataType::String)?;
            for (idx, value) in strings.str()?.into_iter().enumerate() {
                if let Some(v) = value {
                    worksheet.write_string(data_row(idx)?, col, v)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_roundtrip_preserves_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medals.xlsx");
        let df = df!(
            "Year" => &[2000i64, 2004, 2008],
            "NOC" => &["CAN", "USA", "NOR"],
            "Height" => &[180.5f64, 175.25, 190.0],
            "Host" => &[false, true, false]
        )
        .unwrap();

        write_sheet(&df, &path, "Results").unwrap();
        let back = read_sheet(&path, Some("Results")).unwrap();

        assert_eq!(back.shape(), (3, 4));
        assert_eq!(back.column("Year").unwrap().dtype(), &DataType::Int64);
        assert_eq!(back.column("NOC").unwrap().dtype(), &DataType::String);
        assert_eq!(back.column("Height").unwrap().dtype(), &DataType::Float64);
        assert_eq!(back.column("Host").unwrap().dtype(), &DataType::Boolean);
        assert!(back.equals(&df));
    }

    #[test]
    fn test_first_sheet_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let df = df!("Sport" => &["Rowing", "Hockey"]).unwrap();
        write_sheet(&df, &path, "Sheet1").unwrap();

        let back = read_sheet(&path, None).unwrap();
        assert!(back.equals(&df));
    }

    #[test]
    fn test_out_of_range_whole_numbers_stay_float() {
        let huge = Data::Float(1e20);
        let one = Data::Int(1);
        let column = cells_to_column("Prize", &[Some(&huge), Some(&one), None]);
        assert_eq!(column.dtype(), &DataType::Float64);

        let small = Data::Float(2.0);
        let column = cells_to_column("Rank", &[Some(&small), Some(&one)]);
        assert_eq!(column.dtype(), &DataType::Int64);
    }

    #[test]
    fn test_missing_tokens_are_null() {
        let na = Data::String("NA".to_string());
        let age = Data::Int(24);
        let column = cells_to_column("Age", &[Some(&age), Some(&na).filter(|c| !is_missing(c))]);
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.null_count(), 1);
        assert!(is_missing(&Data::Float(f64::NAN)));
        assert!(!is_missing(&Data::String("Nadia".to_string())));
    }

    #[test]
    fn test_unknown_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let df = df!("Sport" => &["Rowing"]).unwrap();
        write_sheet(&df, &path, "Sheet1").unwrap();

        let err = read_sheet(&path, Some("Missing")).unwrap_err();
        assert!(matches!(err, AnalyticsError::SheetNotFound(ref s) if s == "Missing"));
    }

    #[test]
    fn test_nulls_become_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.xlsx");
        let df = df!(
            "Name" => &["A", "B", "C"],
            "Age" => &[Some(21i64), None, Some(30)]
        )
        .unwrap();

        write_sheet(&df, &path, "Sheet1").unwrap();
        let back = read_sheet(&path, None).unwrap();
        assert_eq!(back.column("Age").unwrap().null_count(), 1);
        assert_eq!(back.height(), 3);
    }
}
