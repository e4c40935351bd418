use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::api::{run_api_server, ApiConfig};
use crate::error::ConvertResult;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::Workbook;

/// Execute the serve command
pub fn serve(config: ApiConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_api_server(config))
}

/// Execute the to-json command.
///
/// Without `output` the JSON goes to stdout and nothing else is printed
/// there, so the command can be piped.
pub fn to_json(input: PathBuf, output: Option<PathBuf>, pretty: bool) -> ConvertResult<()> {
    let bytes = fs::read(&input)?;
    let display_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let workbook = ExcelImporter::new().import(&bytes, &display_name)?;
    let json = if pretty {
        workbook.to_json_pretty()?
    } else {
        workbook.to_json()?
    };

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!("{}", "✅ XLSX -> JSON".bold().green());
            println!("   Input:  {}", input.display());
            println!("   Output: {}", path.display());
            print_summary(&workbook);
        }
        None => std::io::stdout().write_all(&json)?,
    }
    Ok(())
}

/// Execute the to-xlsx command, returning the written path
pub fn to_xlsx(input: PathBuf, output: Option<PathBuf>) -> ConvertResult<PathBuf> {
    let payload = fs::read(&input)?;
    let workbook = Workbook::from_json(&payload)?;
    let content = ExcelExporter::new().export(&workbook)?;

    let path = output.unwrap_or_else(|| default_xlsx_path(&input, &workbook.name));
    fs::write(&path, content)?;

    println!("{}", "✅ JSON -> XLSX".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}", path.display());
    print_summary(&workbook);
    Ok(path)
}

fn print_summary(workbook: &Workbook) {
    for sheet in &workbook.sheets {
        println!(
            "   📊 {}: {} columns, {} rows",
            sheet.name.bright_blue(),
            sheet.columns().len(),
            sheet.row_count()
        );
    }
}

/// Sibling of `input` named after the workbook, or `input` with an
/// `.xlsx` extension when the workbook has no usable name
fn default_xlsx_path(input: &Path, workbook_name: &str) -> PathBuf {
    match Path::new(workbook_name).file_name() {
        Some(name) => input.with_file_name(name),
        None => input.with_extension("xlsx"),
    }
}
