//! Blank upload template for the countries catalog.
//!
//! Cosmetic generation only: headers with explanatory notes, one example
//! row, a display format on the date column, and client-side data
//! validations that catch the most common mistakes before upload.

use rust_xlsxwriter::{
    DataValidation, DataValidationRule, ExcelDateTime, Format, Note, Workbook, XlsxError,
};

use crate::report::{FileDownload, XLSX_CONTENT_TYPE};

/// Last 0-based worksheet row, used to span validations over the data area.
const LAST_SHEET_ROW: u32 = 1_048_575;

/// Build the downloadable countries template workbook.
pub fn countries_template() -> Result<FileDownload, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Countries")?;

    sheet.write_string(0, 0, "Code")?;
    sheet.write_string(0, 1, "Name")?;
    sheet.write_string(0, 2, "IsActive")?;
    sheet.write_string(0, 3, "StartDate")?;

    sheet.insert_note(
        0,
        0,
        &Note::new(
            "Code must be numeric only.\nExample: 1001\nNo letters or special characters allowed.",
        ),
    )?;
    sheet.insert_note(0, 1, &Note::new("Name can be any text.\nExample: Singapore"))?;
    sheet.insert_note(0, 2, &Note::new("Allowed values:\nTRUE, FALSE, YES, NO, 1, 0"))?;
    sheet.insert_note(
        0,
        3,
        &Note::new("Must be a valid date.\nFormat: DDMMYYYY\nExample: 01012025"),
    )?;

    // Example row.
    sheet.write_number(1, 0, 1001)?;
    sheet.write_string(1, 1, "Singapore")?;
    sheet.write_string(1, 2, "TRUE")?;
    sheet.write_datetime(1, 3, ExcelDateTime::from_ymd(2025, 1, 1)?)?;

    let date_format = Format::new().set_num_format("dd-mm-yyyy");
    sheet.set_column_format(3, &date_format)?;

    let code_validation = DataValidation::new()
        .allow_whole_number(DataValidationRule::Between(0, i32::MAX))
        .ignore_blank(true)
        .set_error_title("Invalid Code")?
        .set_error_message("Code must be numeric only.")?;
    sheet.add_data_validation(1, 0, LAST_SHEET_ROW, 0, &code_validation)?;

    let date_validation = DataValidation::new()
        .allow_date(DataValidationRule::Between(
            ExcelDateTime::from_ymd(2000, 1, 1)?,
            ExcelDateTime::from_ymd(2100, 12, 31)?,
        ))
        .ignore_blank(true)
        .set_error_title("Invalid Date")?
        .set_error_message("Please enter a valid date in DDMMYYYY format.")?;
    sheet.add_data_validation(1, 3, LAST_SHEET_ROW, 3, &date_validation)?;

    sheet.autofit();

    Ok(FileDownload {
        bytes: workbook.save_to_buffer()?,
        file_name: "countries_template.xlsx".to_string(),
        content_type: XLSX_CONTENT_TYPE,
    })
}
