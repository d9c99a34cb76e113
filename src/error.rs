//! Error types for the csv2pdf library.
//!
//! Every failure is fatal: the batch stops at the first error and the
//! caller gets a single [`Csv2PdfError`]. PDFs already written for earlier
//! records stay on disk, but no success is reported.
//!
//! Failures that are deliberately ignored (launching the PDF viewer,
//! deleting temporary render files) never surface here.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two required input files is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Template,
    Data,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Template => f.write_str("template"),
            InputKind::Data => f.write_str("data file"),
        }
    }
}

/// All errors returned by the csv2pdf library.
#[derive(Debug, Error)]
pub enum Csv2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The template or the data file does not exist.
    #[error("{kind} not found: '{path}'")]
    MissingFile { kind: InputKind, path: PathBuf },

    /// The data file has no header row.
    #[error("Data file '{path}' has no header row")]
    MissingHeader { path: PathBuf },

    /// The header lacks one or more required columns.
    #[error("Data file is missing columns: {missing:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// The header is present but no data rows follow it.
    #[error("Data file '{path}' has no data rows")]
    EmptyData { path: PathBuf },

    /// The data file could not be decoded or parsed.
    #[error("Failed to read data file '{path}': {detail}")]
    DataRead { path: PathBuf, detail: String },

    /// The template exists but could not be read as UTF-8 text.
    #[error("Failed to read template '{path}': {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Renderer errors ───────────────────────────────────────────────────
    /// wkhtmltopdf could not be located or launched.
    #[error(
        "wkhtmltopdf not found: {detail}\n\n\
Install it from https://wkhtmltopdf.org/downloads.html, then either:\n\
  • keep the default install location, or\n\
  • put wkhtmltopdf on PATH, or\n\
  • pass --wkhtmltopdf /path/to/wkhtmltopdf (or set WKHTMLTOPDF_PATH).\n"
    )]
    RendererNotFound { detail: String },

    /// wkhtmltopdf ran but reported an error.
    #[error("wkhtmltopdf was found but failed to render record {index}: {detail}")]
    RenderFailed { index: usize, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory or move a PDF into it.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_both_sets() {
        let e = Csv2PdfError::MissingColumns {
            missing: vec!["qty".into()],
            found: vec!["product".into(), "price".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("\"qty\""), "got: {msg}");
        assert!(msg.contains("\"product\", \"price\""), "got: {msg}");
    }

    #[test]
    fn missing_file_names_kind() {
        let e = Csv2PdfError::MissingFile {
            kind: InputKind::Template,
            path: PathBuf::from("templates/simple_check.html"),
        };
        assert!(e.to_string().starts_with("template not found"));
    }

    #[test]
    fn renderer_not_found_carries_guidance() {
        let e = Csv2PdfError::RendererNotFound {
            detail: "No such file or directory".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("No such file or directory"));
        assert!(msg.contains("WKHTMLTOPDF_PATH"));
    }

    #[test]
    fn render_failed_includes_diagnostic() {
        let e = Csv2PdfError::RenderFailed {
            index: 2,
            detail: "Exit with code 1 due to network error".into(),
        };
        assert!(e.to_string().contains("record 2"));
        assert!(e.to_string().contains("network error"));
    }
}
