//! Excel import/export module
//!
//! This module provides bidirectional XLSX ↔ JSON conversion:
//! - Import: Excel (.xlsx) → [`Workbook`](crate::types::Workbook)
//! - Export: [`Workbook`](crate::types::Workbook) → Excel (.xlsx) with a bold header row

pub mod codec;
mod exporter;
mod importer;

pub use codec::{SheetGrid, SpreadsheetCodec, XlsxCodec};
pub use exporter::{ExcelExporter, ExportedWorkbook};
pub use importer::ExcelImporter;
