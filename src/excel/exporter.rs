//! Excel exporter implementation - JSON → Excel (.xlsx)

use tracing::info;

use crate::error::ConvertResult;
use crate::excel::codec::{SheetGrid, SpreadsheetCodec, XlsxCodec};
use crate::types::Workbook;

/// A written XLSX document plus its suggested download name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedWorkbook {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Converts a [`Workbook`] into spreadsheet bytes
#[derive(Debug, Clone, Default)]
pub struct ExcelExporter<C = XlsxCodec> {
    codec: C,
}

impl ExcelExporter {
    /// Create an exporter producing XLSX
    pub fn new() -> Self {
        Self { codec: XlsxCodec }
    }
}

impl<C: SpreadsheetCodec> ExcelExporter<C> {
    /// Create an exporter over another codec
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Write every sheet of `workbook`.
    ///
    /// Each sheet gets one header row from `columns` in the header style,
    /// then one plain text row per entry of `rows`. Values are never
    /// coerced to numbers.
    pub fn export(&self, workbook: &Workbook) -> ConvertResult<Vec<u8>> {
        let grids: Vec<SheetGrid> = workbook
            .sheets
            .iter()
            .map(|sheet| SheetGrid::new(sheet.name.clone(), sheet.to_grid()).with_header_rows(1))
            .collect();

        info!(
            name = workbook.name.as_str(),
            sheets = workbook.sheet_count(),
            "JSON -> XLSX"
        );
        self.codec.encode(&grids)
    }

    /// Parse a JSON workbook and write it
    pub fn export_json(&self, payload: &[u8]) -> ConvertResult<ExportedWorkbook> {
        let workbook = Workbook::from_json(payload)?;
        let content = self.export(&workbook)?;
        Ok(ExportedWorkbook {
            file_name: workbook.name,
            content,
        })
    }
}
