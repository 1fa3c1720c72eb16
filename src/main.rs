//! printdir - list a directory tree with per-entry metadata.
//!
//! Usage:
//!   printdir [PATH]                         CSV listing of PATH, all fields
//!   printdir [PATH] -o listing.json         JSON listing (format from extension)
//!   printdir [PATH] -f "File Name,Size"     Only the given columns, in that order
//!   printdir [PATH] -d 2                    Do not descend below two levels
//!   printdir --list-fields                  Show available fields
//!   printdir --help                         Show help

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing::info;
use tracing_subscriber::EnvFilter;

use printdir_core::{MetadataField, ScanRequest, ScanResult};
use printdir_export::{ExportFormat, ExportOptions, HtmlOptions, export, export_to_path};
use printdir_scan::{ProgressEvent, ScanEvent, start_scan};

#[derive(Parser)]
#[command(
    name = "printdir",
    version,
    about = "List a directory tree with per-entry metadata",
    long_about = "printdir walks a directory, collects metadata for every file and folder, \n\
                  and saves the listing as CSV, HTML or JSON.\n\n\
                  Press Ctrl-C during a scan to stop it; nothing is written."
)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Comma-separated metadata fields, in column order (default: all)
    #[arg(short, long, value_name = "FIELDS")]
    fields: Option<String>,

    /// Limit scan depth: directories this deep are listed but not entered
    #[arg(
        short = 'd',
        long,
        value_name = "DEPTH",
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    max_depth: Option<u32>,

    /// Output format (defaults to the output file's extension, else csv)
    #[arg(short = 'F', long)]
    format: Option<OutputFormat>,

    /// Output file, or "-" for stdout (defaults to <dirname>_listing.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write HTML cell values without escaping
    #[arg(long)]
    raw_html: bool,

    /// List the available metadata fields and exit
    #[arg(long)]
    list_fields: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Html,
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ExportFormat::Csv,
            OutputFormat::Html => ExportFormat::Html,
            OutputFormat::Json => ExportFormat::Json,
        }
    }
}

/// Where the listing goes.
enum Destination {
    Stdout,
    File(PathBuf),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_fields {
        for field in MetadataField::all() {
            println!("{field}");
        }
        return Ok(());
    }

    let fields = match cli.fields.as_deref() {
        Some(list) => MetadataField::parse_list(list).context("Invalid --fields")?,
        None => MetadataField::all(),
    };
    if fields.is_empty() {
        return Err(eyre!("No metadata fields selected"));
    }

    let request = ScanRequest::builder()
        .root(cli.path.clone())
        .fields(fields)
        .limit_depth(cli.max_depth.is_some())
        .max_depth(cli.max_depth.unwrap_or(printdir_core::DEFAULT_MAX_DEPTH))
        .build()
        .map_err(printdir_core::RequestError::from)?;
    request.validate()?;

    let format = resolve_format(cli.format, cli.output.as_deref());
    let destination = match cli.output {
        Some(path) if path.as_os_str() == "-" => Destination::Stdout,
        Some(path) => Destination::File(path),
        None => Destination::File(PathBuf::from(format.default_file_name(&absolute_root(
            &request.root,
        )))),
    };
    let options = ExportOptions {
        html: if cli.raw_html {
            HtmlOptions::raw()
        } else {
            HtmlOptions::default()
        },
    };

    info!(root = %request.root.display(), ?format, "Starting scan");
    eprintln!("Scanning {}...", request.root.display());
    let Some(result) = run_scan(request.clone()).await? else {
        eprintln!();
        eprintln!("Scan stopped.");
        return Ok(());
    };

    if result.is_empty() {
        eprintln!("No files or folders were found with the current settings.");
        return Ok(());
    }
    if result.skipped > 0 {
        eprintln!("{} item(s) could not be read and were skipped", result.skipped);
    }

    match destination {
        Destination::Stdout => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            export(&mut lock, format, &request.fields, &result.records, &options)
                .context("Failed to write listing")?;
            writeln!(lock)?;
        }
        Destination::File(path) => {
            export_to_path(&path, format, &request.fields, &result.records, &options)
                .with_context(|| format!("Failed to save listing to {}", path.display()))?;
            eprintln!("Directory listing saved successfully to: {}", path.display());
        }
    }

    Ok(())
}

/// Run a background scan, drawing progress on stderr.
///
/// Returns `None` when the scan was stopped with Ctrl-C.
async fn run_scan(request: ScanRequest) -> Result<Option<ScanResult>> {
    let mut session = start_scan(request);

    let stop = session.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.cancel();
        }
    });

    let mut last_percent = None;
    while let Some(event) = session.recv().await {
        match event {
            ScanEvent::TotalKnown(total) => {
                if let Some(line) = total_line(total) {
                    eprintln!("{line}");
                }
            }
            ScanEvent::Progress(progress) => draw_progress(progress, &mut last_percent),
            ScanEvent::Completed(result) => {
                if last_percent.is_some() {
                    eprintln!();
                }
                return Ok(Some(result));
            }
            ScanEvent::Failed(err) => {
                return Err(err).context("An error occurred during processing");
            }
        }
    }

    Ok(None)
}

/// Announce the count. An empty tree is reported once the scan completes.
fn total_line(total: u64) -> Option<String> {
    (total > 0).then(|| format!("Found {total} items"))
}

/// Redraw the progress line when the whole percentage changes.
fn draw_progress(progress: ProgressEvent, last_percent: &mut Option<u64>) {
    let percent = progress.percentage() as u64;
    if *last_percent == Some(percent) && !progress.is_complete() {
        return;
    }
    *last_percent = Some(percent);
    eprint!(
        "\rProcessing {} of {} items... ({percent}%)",
        progress.processed, progress.total
    );
}

/// Explicit format, then the output extension, then CSV.
fn resolve_format(format: Option<OutputFormat>, output: Option<&Path>) -> ExportFormat {
    format
        .map(ExportFormat::from)
        .or_else(|| output.and_then(ExportFormat::from_path))
        .unwrap_or_default()
}

/// Root with `.` and similar resolved, for naming the default output file.
fn absolute_root(root: &Path) -> PathBuf {
    root.canonicalize().unwrap_or_else(|_| root.to_path_buf())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
