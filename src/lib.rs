//! xlsx2json - XLSX ↔ JSON conversion service
//!
//! This library maps spreadsheet documents onto a small JSON document model
//! and back, and exposes both directions over HTTP.
//!
//! # Document model
//!
//! - A [`Workbook`] holds an ordered list of [`Spreadsheet`]s
//! - The first row of a sheet is its header (`columns`), the rest are `rows`
//! - Rows keep their own length; nothing is padded to the header width
//! - Written header cells are bold 10pt Arial, body cells are plain text
//!
//! # Example
//!
//! ```no_run
//! use xlsx2json::excel::{ExcelExporter, ExcelImporter};
//! use xlsx2json::{Spreadsheet, Workbook};
//!
//! let mut workbook = Workbook::new("sample.xlsx");
//! let mut sheet = Spreadsheet::new("Sheet 1").with_columns(["Name", "Qty"]);
//! sheet.add_row(["apples", "3"]);
//! workbook.add_sheet(sheet);
//!
//! let bytes = ExcelExporter::new().export(&workbook)?;
//! let decoded = ExcelImporter::new().import(&bytes, "sample.xlsx")?;
//! assert_eq!(decoded, workbook);
//! # Ok::<(), xlsx2json::error::ConvertError>(())
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{ConvertError, ConvertResult};
pub use types::{Spreadsheet, Workbook};
