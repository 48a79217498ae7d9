mod commands;
mod dialog;
mod logging;
mod output;

use clap::Parser;
use pdfform_core::scan::ScanOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdfform2csv",
    version,
    about = "Collect the form fields of every PDF in a directory into one CSV summary"
)]
struct Cli {
    /// Directory holding the filled PDF forms (a folder picker opens when omitted)
    directory: Option<PathBuf>,

    /// Output format: text (default) or json
    #[arg(short, long, default_value = "text")]
    output: String,

    /// Only read files whose name ends with this suffix
    #[arg(short, long, default_value = ".pdf")]
    extension: String,

    /// Match the extension ignoring case
    #[arg(short, long)]
    ignore_case: bool,

    /// Write the diagnostic log here instead of the temp directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let log_path = cli.log_file.unwrap_or_else(logging::default_log_path);
    let subscriber = logging::file_subscriber(&log_path);

    let options = ScanOptions {
        extension: cli.extension,
        case_insensitive: cli.ignore_case,
    };

    let result = tracing::subscriber::with_default(subscriber, || {
        commands::summarize::run(cli.directory, &cli.output, options)
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
