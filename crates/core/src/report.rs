//! Error report generation for failed import jobs.
//!
//! When the original workbook bytes were kept on the job, the report is
//! the original sheet rebuilt with a `Status` column appended after the
//! last used column, carrying each failed row's errors. Without the
//! original bytes the report degrades to a plain three-column error
//! sheet. Callers must not ask for a report on a job without errors;
//! that precondition is enforced at the API boundary.

use std::collections::BTreeMap;

use calamine::Data;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::job::ImportJob;
use crate::sheet::{Sheet, SheetError};

/// MIME type of xlsx workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A generated file ready to be served as a download.
pub struct FileDownload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
}

/// Why report generation failed.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error("failed to write workbook: {0}")]
    Write(#[from] XlsxError),
}

/// Build the annotated error report for a failed job.
pub fn annotated_report(job: &ImportJob) -> Result<FileDownload, ReportError> {
    match &job.original_file {
        Some(bytes) if !bytes.is_empty() => annotate_original(job, bytes),
        _ => error_sheet(job),
    }
}

/// Rebuild the original sheet with a `Status` column appended.
fn annotate_original(job: &ImportJob, bytes: &[u8]) -> Result<FileDownload, ReportError> {
    let original = Sheet::from_bytes(bytes)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    let last_row = original.last_row();
    let last_column = original.last_column();

    for row in 1..=last_row {
        for column in 1..=last_column {
            if let Some(data) = original.cell(row, column) {
                write_datum(sheet, row - 1, column - 1, data)?;
            }
        }
    }

    // The appended column sits one past the last used column; with
    // 1-based `last_column` that is exactly its 0-based index.
    let status_column = last_column;
    sheet.write_string_with_format(0, status_column, "Status", &bold)?;

    for (row, status) in status_by_row(job) {
        sheet.write_string(row - 1, status_column, status)?;
    }

    sheet.autofit();
    let bytes = workbook.save_to_buffer()?;

    Ok(FileDownload {
        bytes,
        file_name: format!("import_with_status_{}.xlsx", job.id),
        content_type: XLSX_CONTENT_TYPE,
    })
}

/// Per-row status text: all of the row's errors as `"<column>: <message>"`
/// joined by `"; "`, in original error order. Job-level errors (row 0)
/// reference no data row and are left out.
fn status_by_row(job: &ImportJob) -> BTreeMap<u32, String> {
    let mut grouped: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for error in &job.errors {
        if error.row == 0 {
            continue;
        }
        grouped
            .entry(error.row)
            .or_default()
            .push(format!("{}: {}", error.column, error.message));
    }
    grouped
        .into_iter()
        .map(|(row, messages)| (row, messages.join("; ")))
        .collect()
}

/// Fallback report when the original upload was not stored: one row per
/// field error under a `Row`/`Column`/`Message` header.
fn error_sheet(job: &ImportJob) -> Result<FileDownload, ReportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Errors")?;

    let bold = Format::new().set_bold();
    sheet.write_string_with_format(0, 0, "Row", &bold)?;
    sheet.write_string_with_format(0, 1, "Column", &bold)?;
    sheet.write_string_with_format(0, 2, "Message", &bold)?;

    for (i, error) in job.errors.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_number(row, 0, f64::from(error.row))?;
        sheet.write_string(row, 1, &error.column)?;
        sheet.write_string(row, 2, &error.message)?;
    }

    sheet.autofit();
    let bytes = workbook.save_to_buffer()?;

    Ok(FileDownload {
        bytes,
        file_name: format!("import_errors_{}.xlsx", job.id),
        content_type: XLSX_CONTENT_TYPE,
    })
}

fn write_datum(sheet: &mut Worksheet, row: u32, column: u16, data: &Data) -> Result<(), XlsxError> {
    match data {
        Data::Empty | Data::Error(_) => {}
        Data::String(s) => {
            sheet.write_string(row, column, s)?;
        }
        Data::Int(i) => {
            sheet.write_number(row, column, *i as f64)?;
        }
        Data::Float(f) => {
            sheet.write_number(row, column, *f)?;
        }
        Data::Bool(b) => {
            sheet.write_boolean(row, column, *b)?;
        }
        Data::DateTime(dt) => {
            sheet.write_number(row, column, dt.as_f64())?;
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => {
            sheet.write_string(row, column, s)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_xlsxwriter::Workbook;

    use super::*;
    use crate::job::ImportStatus;
    use crate::validate::FieldError;

    fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                sheet.write_string(r as u32, c as u16, *cell).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    fn failed_job(errors: Vec<FieldError>, original_file: Option<Vec<u8>>) -> ImportJob {
        ImportJob {
            id: 42,
            file_name: "countries.xlsx".to_string(),
            status: ImportStatus::Failed,
            total_rows: 2,
            success_count: 1,
            failure_count: 1,
            errors,
            submitted_by: "tester".to_string(),
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
            original_file,
        }
    }

    fn field_error(row: u32, column: &str, message: &str) -> FieldError {
        FieldError { row, column: column.to_string(), message: message.to_string() }
    }

    #[test]
    fn annotated_report_appends_status_column() {
        let original = workbook_bytes(&[
            &["Code", "Name"],
            &["1001", "Singapore"],
            &["abc", "Vietnam"],
        ]);
        let job = failed_job(
            vec![field_error(3, "Code", "Code must be a numeric value.")],
            Some(original),
        );

        let report = annotated_report(&job).unwrap();
        assert_eq!(report.file_name, "import_with_status_42.xlsx");
        assert_eq!(report.content_type, XLSX_CONTENT_TYPE);

        let sheet = Sheet::from_bytes(&report.bytes).unwrap();
        // Original cells survive the rewrite.
        assert_eq!(sheet.cell_string(2, 1), "1001");
        assert_eq!(sheet.cell_string(3, 2), "Vietnam");
        // Status header and per-row annotation sit one past the last column.
        assert_eq!(sheet.cell_string(1, 3), "Status");
        assert_eq!(sheet.cell_string(3, 3), "Code: Code must be a numeric value.");
        assert_eq!(sheet.cell_string(2, 3), "");
    }

    #[test]
    fn multiple_errors_on_a_row_join_in_order() {
        let original = workbook_bytes(&[&["Code", "IsActive"], &["abc", "maybe"]]);
        let job = failed_job(
            vec![
                field_error(2, "Code", "Code must be a numeric value."),
                field_error(2, "IsActive", "IsActive must be a valid boolean value."),
            ],
            Some(original),
        );

        let report = annotated_report(&job).unwrap();
        let sheet = Sheet::from_bytes(&report.bytes).unwrap();
        assert_eq!(
            sheet.cell_string(2, 3),
            "Code: Code must be a numeric value.; IsActive: IsActive must be a valid boolean value."
        );
    }

    #[test]
    fn annotation_is_idempotent_per_row() {
        let original = workbook_bytes(&[&["Code"], &["abc"]]);
        let job = failed_job(
            vec![field_error(2, "Code", "Code must be a numeric value.")],
            Some(original),
        );

        let first = annotated_report(&job).unwrap();
        let second = annotated_report(&job).unwrap();

        let first_sheet = Sheet::from_bytes(&first.bytes).unwrap();
        let second_sheet = Sheet::from_bytes(&second.bytes).unwrap();
        assert_eq!(first_sheet.cell_string(2, 2), second_sheet.cell_string(2, 2));
    }

    #[test]
    fn job_level_errors_reference_no_data_row() {
        let original = workbook_bytes(&[&["Code"], &["1001"]]);
        let job = failed_job(
            vec![field_error(0, "", "Unexpected error: storage backend error")],
            Some(original),
        );

        let report = annotated_report(&job).unwrap();
        let sheet = Sheet::from_bytes(&report.bytes).unwrap();
        assert_eq!(sheet.cell_string(1, 2), "Status");
        assert_eq!(sheet.cell_string(2, 2), "");
    }

    #[test]
    fn missing_original_falls_back_to_error_sheet() {
        let job = failed_job(
            vec![
                field_error(2, "Code", "Code must be a numeric value."),
                field_error(4, "Name", "Name is required."),
            ],
            None,
        );

        let report = annotated_report(&job).unwrap();
        assert_eq!(report.file_name, "import_errors_42.xlsx");

        let sheet = Sheet::from_bytes(&report.bytes).unwrap();
        assert_eq!(sheet.cell_string(1, 1), "Row");
        assert_eq!(sheet.cell_string(1, 2), "Column");
        assert_eq!(sheet.cell_string(1, 3), "Message");
        assert_eq!(sheet.cell_string(2, 1), "2");
        assert_eq!(sheet.cell_string(2, 2), "Code");
        assert_eq!(sheet.cell_string(3, 1), "4");
        assert_eq!(sheet.cell_string(3, 3), "Name is required.");
    }

    #[test]
    fn empty_original_bytes_also_fall_back() {
        let job = failed_job(
            vec![field_error(2, "Code", "Code must be a numeric value.")],
            Some(Vec::new()),
        );
        let report = annotated_report(&job).unwrap();
        assert_eq!(report.file_name, "import_errors_42.xlsx");
    }
}
