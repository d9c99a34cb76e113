//! # csv2pdf
//!
//! Turn every row of a `;`-delimited data file into its own PDF, using a
//! fixed HTML template and [wkhtmltopdf](https://wkhtmltopdf.org/) as the
//! renderer. Built for producing batches of simple receipts ("checks") from a
//! spreadsheet export.
//!
//! ## Pipeline Overview
//!
//! ```text
//! data.csv + template.html
//!  │
//!  ├─ 1. Validate  template and data file exist
//!  ├─ 2. Records   header check (product, price, qty), rows read eagerly
//!  ├─ 3. Fill      {{ product }} / {{ price }} / {{ qty }} per row
//!  ├─ 4. Render    wkhtmltopdf → output/check_<n>.pdf (+ debug_<n>.html)
//!  └─ 5. Report    produced paths in row order
//! ```
//!
//! Rows are rendered one after another, in file order. The first failure
//! aborts the batch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use csv2pdf::{convert, BatchConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder().root("/srv/checks").build()?;
//!     let output = convert(&config)?;
//!     for path in output.pdf_paths() {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `csv2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Data file format
//!
//! UTF-8 (a leading byte-order mark, as Excel writes it, is accepted), `;` as
//! the delimiter, a header row, and at least the columns `product`, `price`
//! and `qty`. Other columns are ignored.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder, DataFormat, RenderMode, TextEncoding};
pub use convert::{convert, inspect};
pub use error::{Csv2PdfError, InputKind};
pub use output::{BatchOutput, BatchStats, DataSummary, RenderedCheck};
pub use pipeline::fill::fill_template;
pub use pipeline::records::{read_records, Record, RecordSet, REQUIRED_FIELDS};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
