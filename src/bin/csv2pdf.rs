//! CLI binary for csv2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `BatchConfig` and prints the produced PDF paths.

use anyhow::{Context, Result};
use clap::Parser;
use csv2pdf::{
    convert, inspect, BatchConfig, BatchProgressCallback, ProgressCallback, RenderMode,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar on stderr, one tick per rendered record.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} records  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Rendering");
        Arc::new(Self { bar })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_records: usize) {
        self.bar.set_length(total_records as u64);
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_record_start(&self, index: usize, _total: usize) {
        self.bar.set_message(format!("record {index}"));
    }

    fn on_record_complete(&self, index: usize, total: usize, pdf_path: &Path) {
        self.bar.println(format!(
            "  {} Record {:>3}/{:<3}  {}",
            green("✓"),
            index,
            total,
            dim(&pdf_path.display().to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_record_error(&self, index: usize, total: usize, error: &str) {
        // Keep the bar line short; the full error follows from main().
        let first_line = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} Record {:>3}/{:<3}  {}",
            red("✗"),
            index,
            total,
            red(first_line),
        ));
        self.bar.abandon();
    }

    fn on_batch_complete(&self, total_records: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} records rendered",
            green("✔"),
            bold(&total_records.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render data/sample_products_EXCEL_RU.csv with templates/simple_check.html
  csv2pdf

  # Another project directory
  csv2pdf --root ~/receipts

  # Explicit files, comma-delimited
  csv2pdf --data rows.csv --template check.html --delimiter , -o out

  # Check the data file without rendering
  csv2pdf --inspect-only

  # Machine-readable result
  csv2pdf --json > result.json

DATA FILE:
  UTF-8 (BOM allowed), ';'-delimited, with a header containing at least
  product, price and qty. Each row becomes output/check_<n>.pdf, numbered
  from 1 in file order. output/debug_<n>.html holds the filled HTML.

TEMPLATE:
  Any HTML file. The tokens {{ product }}, {{ price }} and {{ qty }} are
  replaced verbatim with the row's trimmed values.

ENVIRONMENT VARIABLES:
  WKHTMLTOPDF_PATH        Path to the wkhtmltopdf executable
  CSV2PDF_ROOT            Project root (default: current directory)
  RUST_LOG                Log filter, e.g. csv2pdf=debug

SETUP:
  Install wkhtmltopdf from https://wkhtmltopdf.org/downloads.html.
  On Windows the default install location is found automatically;
  elsewhere it must be on PATH.
"#;

/// Render each row of a delimited data file into its own PDF.
#[derive(Parser, Debug)]
#[command(
    name = "csv2pdf",
    version,
    about = "Render each row of a delimited data file into its own PDF",
    long_about = "Fill an HTML template with every row of a ';'-delimited data file and render \
each result to PDF with wkhtmltopdf. Outputs are numbered check_1.pdf, check_2.pdf, … in row order.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Project root; relative paths below resolve against it.
    #[arg(long, env = "CSV2PDF_ROOT", default_value = ".")]
    root: PathBuf,

    /// Delimited data file.
    #[arg(long, env = "CSV2PDF_DATA", default_value = csv2pdf::config::DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// HTML template with {{ product }}, {{ price }}, {{ qty }} placeholders.
    #[arg(long, env = "CSV2PDF_TEMPLATE", default_value = csv2pdf::config::DEFAULT_TEMPLATE_FILE)]
    template: PathBuf,

    /// Directory for check_<n>.pdf and debug_<n>.html.
    #[arg(short, long, env = "CSV2PDF_OUTPUT_DIR", default_value = csv2pdf::config::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Field delimiter (a single ASCII character).
    #[arg(long, env = "CSV2PDF_DELIMITER", default_value_t = ';')]
    delimiter: char,

    /// wkhtmltopdf executable. Located automatically if omitted
    /// (WKHTMLTOPDF_PATH, the default install location, then PATH).
    #[arg(long)]
    wkhtmltopdf: Option<PathBuf>,

    /// Render through an ASCII-named temp file, then move the PDF (default on Windows).
    #[arg(long, env = "CSV2PDF_TEMP_RENDER")]
    temp_render: bool,

    /// Do not write debug_<n>.html files.
    #[arg(long)]
    no_debug_html: bool,

    /// Do not open the first PDF when done (Windows only).
    #[arg(long)]
    no_open: bool,

    /// Validate the inputs and print a summary of the data file only.
    #[arg(long)]
    inspect_only: bool,

    /// Print the result as JSON instead of a path list.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "CSV2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CSV2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the produced paths.
    #[arg(short, long, env = "CSV2PDF_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs when it is shown.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let summary = inspect(&config).context("Failed to inspect data file")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
            );
        } else {
            println!("File:     {}", summary.path.display());
            println!("Columns:  {}", summary.headers.join(", "));
            println!("Records:  {}", summary.record_count);
        }
        return Ok(());
    }

    // ── Run batch ────────────────────────────────────────────────────────
    let output = convert(&config).context("Batch failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if !cli.quiet {
        eprintln!("{}", bold("Created PDFs:"));
    }
    for path in output.pdf_paths() {
        println!("{}", path.display());
    }
    if !cli.quiet && !show_progress {
        eprintln!(
            "Rendered {}/{} records in {}ms",
            output.stats.rendered, output.stats.total_records, output.stats.total_duration_ms
        );
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    if !cli.delimiter.is_ascii() {
        anyhow::bail!(
            "Delimiter must be a single ASCII character (got {:?})",
            cli.delimiter
        );
    }

    let render_mode = if cli.temp_render {
        RenderMode::ViaTempFile
    } else {
        RenderMode::platform_default()
    };

    let mut builder = BatchConfig::builder()
        .root(&cli.root)
        .data_file(&cli.data)
        .template_file(&cli.template)
        .output_dir(&cli.output_dir)
        .delimiter(cli.delimiter as u8)
        .render_mode(render_mode)
        .write_debug_html(!cli.no_debug_html)
        .open_first_pdf(cfg!(windows) && !cli.no_open && !cli.json);

    if let Some(ref path) = cli.wkhtmltopdf {
        builder = builder.renderer_path(path);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
