//! Excel importer implementation - Excel (.xlsx) → JSON

use tracing::info;

use crate::error::ConvertResult;
use crate::excel::codec::{SpreadsheetCodec, XlsxCodec};
use crate::types::{Spreadsheet, Workbook};

/// Converts uploaded spreadsheet bytes into a [`Workbook`]
#[derive(Debug, Clone, Default)]
pub struct ExcelImporter<C = XlsxCodec> {
    codec: C,
}

impl ExcelImporter {
    /// Create an importer for XLSX input
    pub fn new() -> Self {
        Self { codec: XlsxCodec }
    }
}

impl<C: SpreadsheetCodec> ExcelImporter<C> {
    /// Create an importer over another codec
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Decode `bytes` into a workbook named `display_name`.
    ///
    /// Sheets keep the codec's order. In each sheet the first row is the
    /// header and the rest are body rows, each with its own cell count.
    pub fn import(&self, bytes: &[u8], display_name: &str) -> ConvertResult<Workbook> {
        let grids = self.codec.decode(bytes)?;

        let mut workbook = Workbook::new(display_name);
        for grid in grids {
            workbook.add_sheet(Spreadsheet::from_grid(grid.name, grid.rows));
        }

        info!(
            file = display_name,
            sheets = workbook.sheet_count(),
            "XLSX -> JSON"
        );
        Ok(workbook)
    }

    /// Decode `bytes` straight to the JSON response body
    pub fn import_json(&self, bytes: &[u8], display_name: &str) -> ConvertResult<Vec<u8>> {
        self.import(bytes, display_name)?.to_json()
    }
}
