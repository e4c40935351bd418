use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use xlsx2json::api::ApiConfig;
use xlsx2json::cli;

#[derive(Parser)]
#[command(name = "xlsx2json")]
#[command(about = "Convert XLSX spreadsheets to JSON and back, over HTTP or locally")]
#[command(long_about = "xlsx2json - XLSX <-> JSON conversion

The first row of every sheet is the header (\"columns\"), the remaining rows
are \"rows\". Rows keep their own length. Written header cells are bold.

COMMANDS:
  serve     - Run the HTTP API
  to-json   - Convert a local .xlsx file to JSON
  to-xlsx   - Convert a local JSON workbook to .xlsx

HTTP API:
  POST /            JSON body, or multipart upload in field 'file'
  POST /json2xlsx   JSON body
  GET  /            Upload form (--debug only)

EXAMPLES:
  xlsx2json serve --host 0.0.0.0 --port 8000
  xlsx2json to-json sample.xlsx --pretty
  xlsx2json to-xlsx sample.json -o out.xlsx")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "localhost", env = "API_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8000", env = "API_PORT")]
        port: u16,

        /// Serve the upload form on GET / and log at debug level
        #[arg(long, env = "DEBUG")]
        debug: bool,

        /// Largest accepted request body, in bytes
        #[arg(long, default_value = "33554432", env = "API_MAX_BODY_BYTES")]
        max_body_bytes: usize,

        /// Per-request timeout, in seconds
        #[arg(long, default_value = "10", env = "API_TIMEOUT_SECS")]
        timeout_secs: u64,
    },

    /// Convert an .xlsx file to JSON
    ToJson {
        /// Path to the .xlsx file
        input: PathBuf,

        /// Output JSON file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Convert a JSON workbook to .xlsx
    ToXlsx {
        /// Path to the JSON workbook
        input: PathBuf,

        /// Output .xlsx file (defaults to the workbook name next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            debug,
            max_body_bytes,
            timeout_secs,
        } => cli::serve(ApiConfig {
            host,
            port,
            debug,
            max_body_bytes,
            request_timeout: Duration::from_secs(timeout_secs),
        }),
        Commands::ToJson {
            input,
            output,
            pretty,
        } => Ok(cli::to_json(input, output, pretty)?),
        Commands::ToXlsx { input, output } => {
            cli::to_xlsx(input, output)?;
            Ok(())
        }
    }
}
