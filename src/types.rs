use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

//==============================================================================
// Document Model
//==============================================================================

/// One spreadsheet document: an ordered list of sheets.
///
/// `name` doubles as the suggested download filename when the workbook is
/// written back to XLSX. It may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    pub name: String,
    #[serde(rename = "spreadsheets", default, deserialize_with = "null_as_empty")]
    pub sheets: Vec<Spreadsheet>,
}

/// One sheet: a header row (`columns`) and the body rows beneath it.
///
/// Body rows are sized independently of the header. `None` serializes as
/// JSON `null` and marks a sheet with no header (or no body) at all, which
/// is different from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spreadsheet {
    pub name: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub rows: Option<Vec<Vec<String>>>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Workbook {
    /// Create an empty workbook
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    /// Append a sheet, keeping insertion order
    pub fn add_sheet(&mut self, sheet: Spreadsheet) {
        self.sheets.push(sheet);
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, name: &str) -> Option<&Spreadsheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Parse a workbook from its JSON form
    pub fn from_json(payload: &[u8]) -> ConvertResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    /// Serialize to compact JSON, newline-terminated
    pub fn to_json(&self) -> ConvertResult<Vec<u8>> {
        let mut out = serde_json::to_vec(self).map_err(ConvertError::encode_failure)?;
        out.push(b'\n');
        Ok(out)
    }

    /// Serialize to indented JSON, newline-terminated
    pub fn to_json_pretty(&self) -> ConvertResult<Vec<u8>> {
        let mut out = serde_json::to_vec_pretty(self).map_err(ConvertError::encode_failure)?;
        out.push(b'\n');
        Ok(out)
    }
}

impl Spreadsheet {
    /// Create a sheet with no header and no rows
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: None,
            rows: None,
        }
    }

    /// Builder: set the header row
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Append a body row as-is (no padding to the header width)
    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .get_or_insert_with(Vec::new)
            .push(row.into_iter().map(Into::into).collect());
    }

    /// Build a sheet from a plain cell grid.
    ///
    /// Row 0 becomes the header, every later row a body row. An empty grid
    /// leaves both `columns` and `rows` unset; a grid with only one row
    /// leaves `rows` unset.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<String>>) -> Self {
        let mut sheet = Self::new(name);
        let mut grid = grid.into_iter();
        if let Some(header) = grid.next() {
            sheet.columns = Some(header);
        }
        for row in grid {
            sheet.add_row(row);
        }
        sheet
    }

    /// Header cells, empty when there is no header
    pub fn columns(&self) -> &[String] {
        self.columns.as_deref().unwrap_or_default()
    }

    /// Body rows, empty when there are none
    pub fn rows(&self) -> &[Vec<String>] {
        self.rows.as_deref().unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_none() && self.rows.is_none()
    }

    /// Header followed by body rows, as written to a worksheet.
    ///
    /// The header row is always present, even when `columns` is unset, so
    /// body rows start on the second worksheet row. A sheet with neither
    /// header nor rows produces no rows at all.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut grid = Vec::with_capacity(self.row_count() + 1);
        grid.push(self.columns().to_vec());
        grid.extend(self.rows().iter().cloned());
        grid
    }
}
