//! Spreadsheet codec: the boundary to the binary XLSX container.
//!
//! Converters only see [`SheetGrid`]s of display strings. Reading goes
//! through calamine, writing through rust_xlsxwriter.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use chrono::Timelike;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use crate::error::{ConvertError, ConvertResult};

/// Font face for header cells
pub const HEADER_FONT_NAME: &str = "Arial";
/// Font size (points) for header cells
pub const HEADER_FONT_SIZE: f64 = 10.0;

/// A worksheet as a grid of cell text.
///
/// The first `header_rows` rows are written with the header style. Decoded
/// grids always have `header_rows == 0`; styling is not read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
    pub header_rows: usize,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
            header_rows: 0,
        }
    }

    pub fn with_header_rows(mut self, header_rows: usize) -> Self {
        self.header_rows = header_rows;
        self
    }
}

/// Decode/encode primitives for a binary spreadsheet container
pub trait SpreadsheetCodec {
    /// Decode a complete container into its sheets, in document order
    fn decode(&self, bytes: &[u8]) -> ConvertResult<Vec<SheetGrid>>;

    /// Encode sheets into a complete container
    fn encode(&self, sheets: &[SheetGrid]) -> ConvertResult<Vec<u8>>;
}

/// XLSX codec backed by calamine (read) and rust_xlsxwriter (write)
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxCodec;

impl SpreadsheetCodec for XlsxCodec {
    fn decode(&self, bytes: &[u8]) -> ConvertResult<Vec<SheetGrid>> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).map_err(ConvertError::invalid_document)?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook
                .worksheet_range(&name)
                .map_err(ConvertError::invalid_document)?;
            let rows = grid_rows(&range);
            sheets.push(SheetGrid::new(name, rows));
        }
        Ok(sheets)
    }

    fn encode(&self, sheets: &[SheetGrid]) -> ConvertResult<Vec<u8>> {
        let mut workbook = XlsxWorkbook::new();
        let header = header_format();

        for sheet in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(&sheet.name)
                .map_err(|e| sheet_error(&sheet.name, e))?;

            for (row_idx, cells) in sheet.rows.iter().enumerate() {
                let row = u32::try_from(row_idx)
                    .map_err(|_| sheet_error(&sheet.name, "too many rows"))?;
                let is_header = row_idx < sheet.header_rows;

                for (col_idx, value) in cells.iter().enumerate() {
                    let col = u16::try_from(col_idx)
                        .map_err(|_| sheet_error(&sheet.name, "too many columns"))?;
                    let written = if is_header {
                        worksheet.write_string_with_format(row, col, value, &header)
                    } else {
                        worksheet.write_string(row, col, value)
                    };
                    written.map_err(|e| sheet_error(&sheet.name, e))?;
                }
            }
        }

        workbook
            .save_to_buffer()
            .map_err(ConvertError::encode_failure)
    }
}

/// Bold, 10pt Arial
pub fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_name(HEADER_FONT_NAME)
        .set_font_size(HEADER_FONT_SIZE)
}

fn sheet_error(sheet: &str, cause: impl std::fmt::Display) -> ConvertError {
    ConvertError::EncodeFailure(format!("sheet '{}': {}", sheet, cause))
}

/// Flatten a calamine range into rows of cell text.
///
/// calamine trims ranges to the used area, so leading empty rows and
/// columns are restored here to keep positions absolute from A1. Trailing
/// empty cells are dropped from each row and trailing empty rows from the
/// sheet, which leaves every row exactly as long as its last value.
fn grid_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    if range.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = Vec::new();
        if let Some(last) = row.iter().rposition(|c| !matches!(c, Data::Empty)) {
            cells.resize(start_col as usize, String::new());
            cells.extend(row[..=last].iter().map(cell_text));
        }
        rows.push(cells);
    }

    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }
    rows
}

/// Displayed text of a single cell
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if dt.is_datetime() => {
                if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
                    value.format("%Y-%m-%d").to_string()
                } else {
                    value.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            _ => dt.as_f64().to_string(),
        },
    }
}
