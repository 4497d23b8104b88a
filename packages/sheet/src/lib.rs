#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! XLSX export of extracted records.
//!
//! Records become a single sheet named [`SHEET_NAME`] with the columns
//! `#`, `Key`, `Value`, `Comments` (the record's context), fixed column
//! widths and a bold header row. The same workbook can be written to a file
//! or rendered to bytes for callers that hand the file off themselves.

use std::path::Path;

use kvsheet_record_models::Record;
use rust_xlsxwriter::{Format, RowNum, Workbook, XlsxError};

/// Name of the one sheet in the workbook.
pub const SHEET_NAME: &str = "Output";

/// Column headers and widths (in Excel character units), in order.
pub const COLUMNS: [(&str, f64); 4] = [
    ("#", 4.0),
    ("Key", 25.0),
    ("Value", 35.0),
    ("Comments", 100.0),
];

/// Errors from building or saving the workbook.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// The XLSX writer rejected an operation.
    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),

    /// More records than a sheet can address.
    #[error("Too many rows for one sheet: {0}")]
    TooManyRows(usize),
}

/// One row of the output table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    /// 1-based row index shown in the `#` column.
    pub index: u32,
    /// `Key` column.
    pub key: Option<String>,
    /// `Value` column.
    pub value: Option<String>,
    /// `Comments` column (the record's context).
    pub comments: Option<String>,
}

/// Numbers `records` from 1 and maps them to display columns.
///
/// # Errors
///
/// Returns [`SheetError::TooManyRows`] if a row index does not fit a sheet
/// row number.
pub fn output_rows(records: &[Record]) -> Result<Vec<OutputRow>, SheetError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let index =
                RowNum::try_from(i + 1).map_err(|_| SheetError::TooManyRows(records.len()))?;
            Ok(OutputRow {
                index,
                key: record.key.clone(),
                value: record.value.clone(),
                comments: record.context.clone(),
            })
        })
        .collect()
}

/// Builds the formatted workbook for `records`.
///
/// # Errors
///
/// Returns [`SheetError`] if a row cannot be written.
pub fn build_workbook(records: &[Record]) -> Result<Workbook, SheetError> {
    let rows = output_rows(records)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (col, (header, width)) in (0u16..).zip(COLUMNS) {
        worksheet.set_column_width(col, width)?;
        worksheet.write_string_with_format(0, col, header, &bold)?;
    }

    for row in &rows {
        let r = row.index;
        worksheet.write_number(r, 0, f64::from(row.index))?;
        for (col, cell) in [(1u16, &row.key), (2, &row.value), (3, &row.comments)] {
            if let Some(text) = cell {
                worksheet.write_string(r, col, text)?;
            }
        }
    }

    log::debug!("Built {SHEET_NAME} sheet with {} record rows", rows.len());

    Ok(workbook)
}

/// Writes `records` as an XLSX file at `path`.
///
/// # Errors
///
/// Returns [`SheetError`] if the workbook cannot be built or saved.
pub fn write_xlsx(records: &[Record], path: impl AsRef<Path>) -> Result<(), SheetError> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path.as_ref())?;
    log::info!("Saved {} rows to {}", records.len(), path.as_ref().display());
    Ok(())
}

/// Renders `records` as XLSX file bytes.
///
/// # Errors
///
/// Returns [`SheetError`] if the workbook cannot be built or serialized.
pub fn to_xlsx_bytes(records: &[Record]) -> Result<Vec<u8>, SheetError> {
    let mut workbook = build_workbook(records)?;
    Ok(workbook.save_to_buffer()?)
}
