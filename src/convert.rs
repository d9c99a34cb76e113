//! Batch entry points: validate inputs, then render one PDF per record.
//!
//! A run moves through `Validating → Loading → Rendering(1..=N) → Reporting`.
//! Any error ends the run immediately. PDFs written for earlier records stay
//! on disk, but the caller only ever sees the error.

use crate::config::BatchConfig;
use crate::error::{Csv2PdfError, InputKind};
use crate::output::{BatchOutput, BatchStats, DataSummary, RenderedCheck};
use crate::pipeline::records::{self, Record};
use crate::pipeline::{fill, render::Renderer};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Render every record of the configured data file to `check_<n>.pdf`.
///
/// # Returns
/// The produced PDFs in record order (`check_1.pdf` … `check_N.pdf`).
///
/// # Errors
/// - [`Csv2PdfError::MissingFile`]: template or data file absent
/// - [`Csv2PdfError::MissingHeader`], [`Csv2PdfError::MissingColumns`],
///   [`Csv2PdfError::EmptyData`], [`Csv2PdfError::DataRead`]: bad data file
/// - [`Csv2PdfError::RendererNotFound`]: raised before any PDF is written
///   when wkhtmltopdf cannot be located
/// - [`Csv2PdfError::RenderFailed`]: first failing record aborts the batch
pub fn convert(config: &BatchConfig) -> Result<BatchOutput, Csv2PdfError> {
    let total_start = Instant::now();

    // ── Step 1: Validate inputs ──────────────────────────────────────────
    let template_path = config.template_path();
    let data_path = config.data_path();
    require_file(InputKind::Template, &template_path)?;
    require_file(InputKind::Data, &data_path)?;

    // ── Step 2: Load template, records and renderer ─────────────────────
    let template = read_template(&template_path)?;
    let record_set = records::read_records(&data_path, &config.data_format)?;
    let renderer = Renderer::locate(config.renderer_path.as_deref(), config.render_mode)?;

    let total = record_set.records.len();
    info!(
        "Rendering {} records from {} with {}",
        total,
        data_path.display(),
        template_path.display()
    );

    // ── Step 3: Prepare output directory ─────────────────────────────────
    let output_dir = config.output_path();
    std::fs::create_dir_all(&output_dir).map_err(|e| Csv2PdfError::OutputWriteFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    // ── Step 4: Render records in file order ─────────────────────────────
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut checks = Vec::with_capacity(total);
    for record in &record_set.records {
        let index = record.index();
        if let Some(ref cb) = config.progress_callback {
            cb.on_record_start(index, total);
        }

        match render_record(config, &renderer, &template, record) {
            Ok(check) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_record_complete(index, total, &check.pdf_path);
                }
                checks.push(check);
            }
            Err(e) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_record_error(index, total, &e.to_string());
                }
                return Err(e);
            }
        }
    }

    // ── Step 5: Report ───────────────────────────────────────────────────
    let stats = BatchStats {
        total_records: total,
        rendered: checks.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {} PDFs in {} ({}ms)",
        stats.rendered,
        output_dir.display(),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total);
    }

    if config.open_first_pdf {
        if let Some(first) = checks.first() {
            open_in_viewer(&first.pdf_path);
        }
    }

    Ok(BatchOutput { checks, stats })
}

/// Validate the inputs and read the data file without rendering anything.
pub fn inspect(config: &BatchConfig) -> Result<DataSummary, Csv2PdfError> {
    let data_path = config.data_path();
    require_file(InputKind::Template, &config.template_path())?;
    require_file(InputKind::Data, &data_path)?;

    let record_set = records::read_records(&data_path, &config.data_format)?;
    Ok(DataSummary {
        path: data_path,
        headers: record_set.headers,
        record_count: record_set.records.len(),
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn require_file(kind: InputKind, path: &Path) -> Result<(), Csv2PdfError> {
    if path.exists() {
        Ok(())
    } else {
        Err(Csv2PdfError::MissingFile {
            kind,
            path: path.to_path_buf(),
        })
    }
}

fn read_template(path: &Path) -> Result<String, Csv2PdfError> {
    std::fs::read_to_string(path).map_err(|e| Csv2PdfError::TemplateRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Fill, dump the debug HTML, and render a single record.
fn render_record(
    config: &BatchConfig,
    renderer: &Renderer,
    template: &str,
    record: &Record,
) -> Result<RenderedCheck, Csv2PdfError> {
    let index = record.index();
    let html = fill::fill_template(template, record);

    let leftover = fill::unfilled_placeholders(&html);
    if !leftover.is_empty() {
        debug!("Record {}: placeholders left as-is: {:?}", index, leftover);
    }

    let debug_html = if config.write_debug_html {
        write_debug_html(&config.debug_html_path(index), &html)
    } else {
        None
    };

    let pdf_path = config.pdf_path(index);
    let start = Instant::now();
    renderer.render(index, &html, &pdf_path)?;

    Ok(RenderedCheck {
        index,
        pdf_path,
        debug_html,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// The debug copy is for humans; failing to write it never stops the batch.
fn write_debug_html(path: &Path, html: &str) -> Option<PathBuf> {
    match std::fs::write(path, html) {
        Ok(()) => Some(path.to_path_buf()),
        Err(e) => {
            warn!("Could not write {}: {}", path.display(), e);
            None
        }
    }
}

/// Hand `path` to the desktop's default PDF viewer. Errors are ignored.
#[cfg(windows)]
fn open_in_viewer(path: &Path) {
    use std::process::{Command, Stdio};

    let _ = Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
}

#[cfg(not(windows))]
fn open_in_viewer(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<p>{{ product }} {{ price }} {{ qty }}</p>";

    fn project(csv: &str) -> TempDir {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("data")).unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::write(root.path().join("data/sample_products_EXCEL_RU.csv"), csv).unwrap();
        fs::write(root.path().join("templates/simple_check.html"), TEMPLATE).unwrap();
        root
    }

    fn config_for(root: &Path) -> BatchConfig {
        BatchConfig::builder()
            .root(root)
            .renderer_path(root.join("no-such-wkhtmltopdf"))
            .open_first_pdf(false)
            .build()
            .unwrap()
    }

    #[test]
    fn missing_template_is_reported_first() {
        let root = TempDir::new().unwrap();
        let err = convert(&config_for(root.path())).unwrap_err();
        match err {
            Csv2PdfError::MissingFile { kind, path } => {
                assert_eq!(kind, InputKind::Template);
                assert!(path.ends_with("templates/simple_check.html"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_data_file() {
        let root = project("product;price;qty\nMilk;49.90;2\n");
        fs::remove_file(root.path().join("data/sample_products_EXCEL_RU.csv")).unwrap();
        let err = convert(&config_for(root.path())).unwrap_err();
        assert!(matches!(
            err,
            Csv2PdfError::MissingFile {
                kind: InputKind::Data,
                ..
            }
        ));
    }

    #[test]
    fn missing_columns_produce_no_output() {
        let root = project("product;price\nMilk;49.90\n");
        let err = convert(&config_for(root.path())).unwrap_err();
        assert!(matches!(err, Csv2PdfError::MissingColumns { ref missing, .. } if missing == &["qty"]));
        assert!(!root.path().join("output").exists());
    }

    #[test]
    fn empty_data_is_fatal() {
        let root = project("\u{feff}product;price;qty\n");
        let err = convert(&config_for(root.path())).unwrap_err();
        assert!(matches!(err, Csv2PdfError::EmptyData { .. }));
    }

    #[test]
    fn unresolvable_renderer_fails_before_any_output() {
        let root = project("product;price;qty\nMilk;49.90;2\nBread;35.00;1\n");
        let err = convert(&config_for(root.path())).unwrap_err();
        assert!(matches!(err, Csv2PdfError::RendererNotFound { .. }));
        assert!(!root.path().join("output/check_1.pdf").exists());
        assert!(!root.path().join("output/debug_1.html").exists());
    }

    #[test]
    fn inspect_counts_records() {
        let root = project("\u{feff}product;price;qty;note\nMilk;49.90;2;\nBread;35.00;1;fresh\n");
        let summary = inspect(&config_for(root.path())).unwrap();
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.headers, vec!["product", "price", "qty", "note"]);
    }

    #[test]
    fn debug_html_failure_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let unwritable = dir.path().join("missing-dir/debug_1.html");
        assert_eq!(write_debug_html(&unwritable, "<p/>"), None);
    }
}
