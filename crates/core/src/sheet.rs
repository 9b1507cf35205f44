//! Read-side access to uploaded workbooks.
//!
//! Wraps a calamine range over fully buffered bytes and exposes 1-based
//! cell addressing matching the column rule set convention. Only the
//! first worksheet of a workbook is ever read.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

/// Sheet row occupied by the column headers.
pub const HEADER_ROW: u32 = 1;

/// First sheet row that carries data.
pub const FIRST_DATA_ROW: u32 = 2;

/// Why a workbook could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("workbook has no sheets")]
    NoSheets,
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),
}

/// The used cell range of the first worksheet.
pub struct Sheet {
    range: Range<Data>,
}

impl Sheet {
    /// Open the first worksheet of an xlsx workbook held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SheetError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let name = workbook
            .sheet_names()
            .first()
            .ok_or(SheetError::NoSheets)?
            .clone();
        let range = workbook.worksheet_range(&name)?;
        Ok(Self { range })
    }

    /// 1-based number of the last used row, or 0 for an empty sheet.
    pub fn last_row(&self) -> u32 {
        self.range.end().map(|(row, _)| row + 1).unwrap_or(0)
    }

    /// 1-based index of the last used column, or 0 for an empty sheet.
    pub fn last_column(&self) -> u16 {
        self.range.end().map(|(_, col)| col as u16 + 1).unwrap_or(0)
    }

    /// Trimmed display string of the cell at 1-based coordinates.
    /// Unused cells read as the empty string.
    pub fn cell_string(&self, row: u32, column: u16) -> String {
        self.cell(row, column).map(data_to_string).unwrap_or_default()
    }

    /// Raw cell datum at 1-based coordinates.
    pub fn cell(&self, row: u32, column: u16) -> Option<&Data> {
        self.range.get_value((row - 1, u32::from(column) - 1))
    }
}

fn data_to_string(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole floats print without the trailing ".0".
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

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

    #[test]
    fn reads_cells_with_one_based_addressing() {
        let bytes = workbook_bytes(&[&["Code", "Name"], &["1001", "Singapore"]]);
        let sheet = Sheet::from_bytes(&bytes).unwrap();
        assert_eq!(sheet.cell_string(1, 1), "Code");
        assert_eq!(sheet.cell_string(2, 2), "Singapore");
    }

    #[test]
    fn tracks_used_extent() {
        let bytes = workbook_bytes(&[&["a", "b", "c"], &["d"]]);
        let sheet = Sheet::from_bytes(&bytes).unwrap();
        assert_eq!(sheet.last_row(), 2);
        assert_eq!(sheet.last_column(), 3);
    }

    #[test]
    fn unused_cell_reads_empty() {
        let bytes = workbook_bytes(&[&["a"]]);
        let sheet = Sheet::from_bytes(&bytes).unwrap();
        assert_eq!(sheet.cell_string(5, 5), "");
    }

    #[test]
    fn numeric_cells_format_without_decimal_point() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_number(0, 0, 1001.0).unwrap();
        sheet.write_number(0, 1, 10.5).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let sheet = Sheet::from_bytes(&bytes).unwrap();
        assert_eq!(sheet.cell_string(1, 1), "1001");
        assert_eq!(sheet.cell_string(1, 2), "10.5");
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(Sheet::from_bytes(b"not a workbook").is_err());
    }
}
